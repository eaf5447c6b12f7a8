//! Tempo Perf - an in-process runtime performance layer
//!
//! TTL + LRU caching with priority-aware pressure eviction, named
//! sliding-window rate limiting, cache-aside and rate-limited request
//! wrappers, a bounded batch executor, and a stats reporter - wired
//! together behind one explicitly constructed [`PerfService`] handle.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheOptions, CacheStats, CacheStore, EstimateSize};
pub use config::{BatchConfig, CacheConfig, Config, MemoryConfig};
pub use error::{PerfError, Result};
pub use limiter::{LimiterDecision, LimiterStatus, RateLimiterConfig};
pub use metrics::PerformanceMetrics;
pub use service::{
    BatchFailure, BatchOutcome, BatchSuccess, BudgetGauge, MemoryGauge, OptimizeOutcome,
    PerfService, PerformanceReport, Recommendation, RecommendationKind,
};
pub use tasks::spawn_maintenance_task;
