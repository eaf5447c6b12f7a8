//! Service Module
//!
//! The `PerfService` handle: one explicitly constructed object owning the
//! cache store, limiter registry, and process metrics. The process entry
//! point builds it from configuration and hands clones to callers; there
//! is no ambient global instance.

mod batch;
mod monitor;
mod report;
mod request;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheOptions, CacheStats, CacheStore, EstimateSize};
use crate::config::{BatchConfig, Config, MemoryConfig};
use crate::error::Result;
use crate::limiter::{LimiterDecision, LimiterRegistry, LimiterStatus, RateLimiterConfig};
use crate::metrics::PerformanceMetrics;

pub use batch::{BatchFailure, BatchOutcome, BatchSuccess};
pub use monitor::{BudgetGauge, MemoryGauge, OptimizeOutcome};
pub use report::{PerformanceReport, Recommendation, RecommendationKind};

// == Perf Service ==
/// Shared handle over the runtime performance layer.
///
/// Cloning is cheap: clones share the same store, registry, and metrics.
/// All mutations go through a `tokio::sync::RwLock`, so concurrent callers
/// never observe a half-updated entry or admission log.
pub struct PerfService<V> {
    cache: Arc<RwLock<CacheStore<V>>>,
    limiters: Arc<RwLock<LimiterRegistry>>,
    metrics: Arc<RwLock<PerformanceMetrics>>,
    gauge: Arc<dyn MemoryGauge>,
    batch_defaults: BatchConfig,
    memory: MemoryConfig,
}

impl<V> Clone for PerfService<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            limiters: Arc::clone(&self.limiters),
            metrics: Arc::clone(&self.metrics),
            gauge: Arc::clone(&self.gauge),
            batch_defaults: self.batch_defaults.clone(),
            memory: self.memory.clone(),
        }
    }
}

impl<V: Clone + EstimateSize> PerfService<V> {
    // == Constructor ==
    /// Creates a service from configuration, with the default byte-budget
    /// memory gauge.
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache: Arc::new(RwLock::new(CacheStore::new(
                config.cache.max_entries,
                config.cache.default_ttl,
            ))),
            limiters: Arc::new(RwLock::new(LimiterRegistry::new())),
            metrics: Arc::new(RwLock::new(PerformanceMetrics::new())),
            gauge: Arc::new(BudgetGauge::new(config.memory.budget_bytes)),
            batch_defaults: config.batch.clone(),
            memory: config.memory.clone(),
        }
    }

    /// Replaces the memory gauge; used to inject a custom usage signal.
    pub fn with_memory_gauge(mut self, gauge: Arc<dyn MemoryGauge>) -> Self {
        self.gauge = gauge;
        self
    }

    // == Cache Operations ==
    /// Stores a value under `key` with optional TTL/priority overrides.
    pub async fn cache_set(
        &self,
        key: impl Into<String>,
        value: V,
        options: CacheOptions,
    ) -> Result<()> {
        self.cache.write().await.set(key.into(), value, options)
    }

    /// Retrieves a live value by key, refreshing its recency.
    pub async fn cache_get(&self, key: &str) -> Option<V> {
        self.cache.write().await.get(key)
    }

    /// Checks for a live entry without touching recency or counters.
    pub async fn cache_has(&self, key: &str) -> bool {
        self.cache.read().await.has(key)
    }

    /// Removes one entry; returns whether it was present.
    pub async fn cache_delete(&self, key: &str) -> bool {
        self.cache.write().await.delete(key)
    }

    /// Removes all entries.
    pub async fn cache_clear(&self) {
        self.cache.write().await.clear();
    }

    /// Removes all expired entries, returning how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        self.cache.write().await.sweep_expired()
    }

    /// Snapshot of the store's counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Limiter Operations ==
    /// Registers or replaces a named limiter.
    pub async fn create_limiter(&self, name: &str, config: RateLimiterConfig) -> Result<()> {
        self.limiters.write().await.create(name, config)
    }

    /// Consumes one admission from the named limiter.
    pub async fn check_limiter(&self, name: &str) -> Result<LimiterDecision> {
        self.limiters.write().await.check(name)
    }

    /// Read-only status of the named limiter.
    pub async fn limiter_status(&self, name: &str) -> Result<LimiterStatus> {
        self.limiters.read().await.status(name)
    }

    // == Metrics ==
    /// Snapshot of the process metrics.
    pub async fn metrics(&self) -> PerformanceMetrics {
        self.metrics.read().await.clone()
    }

    /// Zeroes the process metrics (tests/administrative use).
    pub async fn reset_metrics(&self) {
        self.metrics.write().await.reset();
    }

    // == Internal Accessors ==
    pub(crate) fn cache_handle(&self) -> &Arc<RwLock<CacheStore<V>>> {
        &self.cache
    }

    pub(crate) fn metrics_handle(&self) -> &Arc<RwLock<PerformanceMetrics>> {
        &self.metrics
    }

    pub(crate) fn limiters_handle(&self) -> &Arc<RwLock<LimiterRegistry>> {
        &self.limiters
    }

    pub(crate) fn gauge(&self) -> &Arc<dyn MemoryGauge> {
        &self.gauge
    }

    pub(crate) fn batch_defaults(&self) -> &BatchConfig {
        &self.batch_defaults
    }

    pub(crate) fn memory_config(&self) -> &MemoryConfig {
        &self.memory
    }
}
