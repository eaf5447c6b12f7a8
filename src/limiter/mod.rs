//! Rate Limiter Module
//!
//! Named sliding-window rate limiting: each limiter answers "is this call
//! allowed now" against its own quota and reports remaining budget.

mod registry;
mod window;

// Re-export public types
pub use registry::LimiterRegistry;
pub use window::{LimiterDecision, LimiterStatus, RateLimiterConfig, WindowLimiter};
