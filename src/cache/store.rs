//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration, and priority-aware eviction under memory pressure.

use std::collections::HashMap;

use crate::cache::{
    CacheEntry, CacheStats, EstimateSize, LruTracker, DEFAULT_PRIORITY, MAX_KEY_LENGTH,
    MAX_VALUE_SIZE,
};
use crate::error::{PerfError, Result};

// == Cache Options ==
/// Per-entry overrides for `set` and the cache-aside executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// TTL in seconds; falls back to the store default when unset
    pub ttl: Option<u64>,
    /// Eviction weight; falls back to the default priority when unset
    pub priority: Option<u32>,
}

impl CacheOptions {
    /// Options with an explicit TTL and the default priority.
    pub fn with_ttl(ttl: u64) -> Self {
        Self {
            ttl: Some(ttl),
            priority: None,
        }
    }
}

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Payloads are opaque apart from their [`EstimateSize`] cost, which is
/// computed once at insertion and summed into the store's byte estimate.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl<V: Clone + EstimateSize> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold (min 1)
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL and priority.
    ///
    /// If the key already exists, the value is overwritten and TTL is reset.
    /// If the cache is at capacity, least recently used entries are evicted
    /// until the insert fits.
    pub fn set(&mut self, key: String, value: V, options: CacheOptions) -> Result<()> {
        // Validate key length
        if key.len() > MAX_KEY_LENGTH {
            return Err(PerfError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let entry = CacheEntry::new(
            value,
            options.ttl.unwrap_or(self.default_ttl),
            options.priority.unwrap_or(DEFAULT_PRIORITY),
        );

        // Validate estimated value size
        if entry.size_estimate > MAX_VALUE_SIZE {
            return Err(PerfError::InvalidRequest(format!(
                "Value exceeds maximum estimated size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if let Some(old) = self.entries.remove(&key) {
            // Overwrite: release the old entry's byte cost
            self.subtract_bytes(old.size_estimate);
        } else {
            // New key: evict least recently used entries until within bound
            while self.entries.len() >= self.max_entries {
                let Some(evicted_key) = self.lru.evict_oldest() else {
                    break;
                };
                if let Some(evicted) = self.entries.remove(&evicted_key) {
                    self.subtract_bytes(evicted.size_estimate);
                    self.stats.record_eviction();
                }
            }
        }

        self.stats
            .set_estimated_bytes(self.stats.estimated_bytes + entry.size_estimate);
        self.entries.insert(key.clone(), entry);

        // Update LRU tracker (touch moves to front)
        self.lru.touch(&key);

        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired; expired entries are
    /// removed on access. Absent and expired lookups count as misses,
    /// successful lookups count as hits and refresh the access order.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = self.entries.get(key).map(CacheEntry::is_expired);

        match expired {
            None => {
                self.stats.record_miss();
                None
            }
            Some(true) => {
                self.remove_entry(key);
                self.stats.record_expired_removal();
                self.stats.record_miss();
                None
            }
            Some(false) => {
                let value = {
                    let entry = self.entries.get_mut(key)?;
                    entry.record_hit();
                    entry.value.clone()
                };
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
        }
    }

    // == Has ==
    /// Checks whether a live entry exists for the key.
    ///
    /// Applies the same expiry rule as `get` without touching access order
    /// or the hit/miss counters; an expired entry is left for the sweep.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    // == Delete ==
    /// Removes an entry by key; returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_estimated_bytes(0);
        self.stats.set_total_entries(0);
    }

    // == Sweep Expired ==
    /// Removes all entries whose TTL has elapsed.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove_entry(&key);
            self.stats.record_expired_removal();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Evict By Priority ==
    /// Removes lowest-priority entries until at most `target_count` remain.
    ///
    /// Within a priority level, the least recently used entries go first.
    /// Used by the memory monitor under pressure; no-op when the store is
    /// already at or below the target.
    pub fn evict_by_priority(&mut self, target_count: usize) -> usize {
        if self.entries.len() <= target_count {
            return 0;
        }
        let excess = self.entries.len() - target_count;

        // Oldest-first order; stable sort by priority keeps recency order
        // within each priority level.
        let mut candidates: Vec<String> = self.lru.iter_oldest_first().cloned().collect();
        candidates.sort_by_key(|key| {
            self.entries
                .get(key)
                .map(|entry| entry.priority)
                .unwrap_or(u32::MAX)
        });

        for key in candidates.into_iter().take(excess) {
            self.remove_entry(&key);
            self.stats.record_eviction();
        }

        self.stats.set_total_entries(self.entries.len());
        excess
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Estimated Bytes ==
    /// Approximate total byte cost of live entries.
    pub fn estimated_bytes(&self) -> usize {
        self.stats.estimated_bytes
    }

    // == Internal Helpers ==
    /// Removes an entry and its tracker state, releasing its byte cost.
    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(key);
                self.subtract_bytes(entry.size_estimate);
                true
            }
            None => false,
        }
    }

    fn subtract_bytes(&mut self, bytes: usize) {
        self.stats
            .set_estimated_bytes(self.stats.estimated_bytes.saturating_sub(bytes));
    }
}
