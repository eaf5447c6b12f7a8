//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::EstimateSize;

// == Cache Entry ==
/// A single cache entry: payload plus bookkeeping metadata.
///
/// The payload is opaque to the cache apart from its size estimate,
/// which is computed once at insertion.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Approximate payload cost in bytes
    pub size_estimate: usize,
    /// Eviction weight; lower priorities are evicted first under pressure
    pub priority: u32,
    /// Number of times this entry has been returned by a lookup
    pub hits: u64,
}

impl<V: EstimateSize> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    ///
    /// # Arguments
    /// * `value` - The payload to store
    /// * `ttl_seconds` - TTL in seconds
    /// * `priority` - Eviction weight (1 = default, behaves as plain LRU)
    pub fn new(value: V, ttl_seconds: u64, priority: u32) -> Self {
        let now = current_timestamp_ms();
        let size_estimate = value.estimate_size();

        Self {
            value,
            created_at: now,
            expires_at: now + ttl_seconds * 1000,
            size_estimate,
            priority,
            hits: 0,
        }
    }
}

impl<V> CacheEntry<V> {
    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so an entry is
    /// logically absent the instant its TTL elapses.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let now = current_timestamp_ms();
        self.expires_at.saturating_sub(now)
    }

    /// Returns remaining TTL in whole seconds, 0 once expired.
    pub fn ttl_remaining(&self) -> u64 {
        self.ttl_remaining_ms() / 1000
    }

    // == Record Hit ==
    /// Increments the per-entry hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
