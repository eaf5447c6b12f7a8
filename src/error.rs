//! Error types for the performance layer
//!
//! Provides unified error handling using thiserror. A cache miss is not an
//! error: lookups model absence as `Option`, and `KeyNotFound` exists only
//! so the HTTP surface can map absence to a 404.

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Perf Error Enum ==
/// Unified error type for the performance layer.
#[derive(Error, Debug)]
pub enum PerfError {
    /// Key absent or expired (HTTP surface only)
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Rate limiter name used before registration
    #[error("Rate limiter not configured: {0}")]
    NotConfigured(String),

    /// Quota exhausted for the named limiter
    #[error("Rate limit exceeded for '{name}', retry after {retry_after_ms}ms")]
    RateLimitExceeded {
        name: String,
        retry_after_ms: u64,
    },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed configuration, rejected at registration time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure raised by a caller-supplied producer, propagated unchanged
    #[error("Producer failed: {0}")]
    Producer(#[from] anyhow::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for PerfError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PerfError::KeyNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            PerfError::NotConfigured(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            PerfError::RateLimitExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, self.to_string())
            }
            PerfError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            PerfError::InvalidConfig(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            PerfError::Producer(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let mut body = json!({ "error": message });
        if let PerfError::RateLimitExceeded { retry_after_ms, .. } = &self {
            body["retry_after_ms"] = json!(retry_after_ms);
        }

        let mut response = (status, Json(body)).into_response();

        // Standard Retry-After header (whole seconds, rounded up)
        if let PerfError::RateLimitExceeded { retry_after_ms, .. } = &self {
            let retry_after_secs = retry_after_ms.div_ceil(1000);
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the performance layer.
pub type Result<T> = std::result::Result<T, PerfError>;
