//! Request DTOs for the ops API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{CacheOptions, MAX_KEY_LENGTH};
use crate::limiter::RateLimiterConfig;

/// Request body for the cache set operation (PUT /cache)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Arbitrary JSON payload to store
/// - `ttl`: Optional TTL in seconds (uses the store default if unset)
/// - `priority`: Optional eviction weight (default 1)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The payload to store
    pub value: serde_json::Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
    /// Optional eviction weight
    #[serde(default)]
    pub priority: Option<u32>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        None
    }

    /// The cache options carried by this request.
    pub fn options(&self) -> CacheOptions {
        CacheOptions {
            ttl: self.ttl,
            priority: self.priority,
        }
    }
}

/// Request body for limiter registration (PUT /limiters/:name)
#[derive(Debug, Clone, Deserialize)]
pub struct LimiterRequest {
    /// Admissions allowed within one window
    pub requests: usize,
    /// Window duration in milliseconds
    pub window_ms: u64,
}

impl LimiterRequest {
    /// The limiter configuration carried by this request.
    pub fn config(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_requests: self.requests,
            window_ms: self.window_ms,
        }
    }
}
