//! Process Metrics Module
//!
//! Request-level counters for the executors: outbound call volume, cache-
//! aside hit/miss traffic, failures, and a running latency average. One
//! instance lives inside the service handle for the process lifetime;
//! nothing is persisted.

use serde::Serialize;

// == Performance Metrics ==
/// Counters aggregated across all executor calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceMetrics {
    /// Producer invocations made through the rate-limited executor
    pub api_calls: u64,
    /// Cache-aside lookups served from the cache
    pub cache_hits: u64,
    /// Cache-aside lookups that fell through to the producer
    pub cache_misses: u64,
    /// Producer failures observed by the executors
    pub errors: u64,
    /// Cumulative moving average of producer latency in milliseconds
    pub avg_response_time_ms: f64,
}

impl PerformanceMetrics {
    // == Constructor ==
    /// Creates metrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record API Call ==
    /// Counts one producer invocation and folds its latency into the
    /// cumulative moving average.
    pub fn record_api_call(&mut self, latency_ms: f64) {
        self.api_calls += 1;
        self.avg_response_time_ms +=
            (latency_ms - self.avg_response_time_ms) / self.api_calls as f64;
    }

    // == Record Cache Hit ==
    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    // == Record Cache Miss ==
    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    // == Record Error ==
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    // == Hit Rate ==
    /// Cache-aside hit rate; 0.0 before any cache-aside traffic.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    // == Error Rate ==
    /// Failures per producer invocation; 0.0 before any calls.
    pub fn error_rate(&self) -> f64 {
        if self.api_calls == 0 {
            0.0
        } else {
            self.errors as f64 / self.api_calls as f64
        }
    }

    // == Reset ==
    /// Zeroes every counter; intended for tests and administrative use.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
