//! Memory Monitor
//!
//! Advisory memory-pressure relief: above a usage threshold, sweep expired
//! entries first, then shed lowest-priority entries in fixed fractions
//! until usage drops below the threshold or the store is empty. Never
//! blocks or fails the caller.

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheStats, EstimateSize};
use crate::service::PerfService;

// == Memory Gauge ==
/// The usage signal consulted by the monitor.
///
/// A trait seam rather than a direct heap probe so tests (and hosts with a
/// real allocator signal) can supply their own ratio.
pub trait MemoryGauge: Send + Sync {
    /// Current usage as a used/limit ratio; 1.0 means the budget is spent.
    fn usage_ratio(&self, stats: &CacheStats) -> f64;
}

/// Default gauge: the store's estimated byte total against a fixed budget.
#[derive(Debug)]
pub struct BudgetGauge {
    budget_bytes: usize,
}

impl BudgetGauge {
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            budget_bytes: budget_bytes.max(1),
        }
    }
}

impl MemoryGauge for BudgetGauge {
    fn usage_ratio(&self, stats: &CacheStats) -> f64 {
        stats.estimated_bytes as f64 / self.budget_bytes as f64
    }
}

// == Optimize Outcome ==
/// Summary of one monitor pass.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeOutcome {
    /// Whether the threshold was exceeded and optimization ran
    pub ran: bool,
    /// Usage ratio observed at the start of the pass
    pub usage_before: f64,
    /// Usage ratio after the pass (equals `usage_before` for a no-op)
    pub usage_after: f64,
    /// Expired entries removed
    pub swept: usize,
    /// Entries shed by priority eviction
    pub evicted: usize,
}

impl<V: Clone + EstimateSize> PerfService<V> {
    // == Check And Optimize ==
    /// Runs one advisory memory check.
    ///
    /// Below the configured threshold this is a no-op. Above it: sweep
    /// expired entries, re-read the gauge, then evict by priority in
    /// rounds of the configured fraction until under the threshold or the
    /// store is empty.
    pub async fn check_and_optimize(&self) -> OptimizeOutcome {
        let threshold = self.memory_config().threshold;
        let fraction = self.memory_config().eviction_fraction;

        let mut cache = self.cache_handle().write().await;
        let usage_before = self.gauge().usage_ratio(&cache.stats());

        if usage_before <= threshold {
            debug!(usage = usage_before, threshold, "memory usage below threshold");
            return OptimizeOutcome {
                ran: false,
                usage_before,
                usage_after: usage_before,
                swept: 0,
                evicted: 0,
            };
        }

        let swept = cache.sweep_expired();
        let mut usage = self.gauge().usage_ratio(&cache.stats());
        let mut evicted = 0;

        while usage > threshold && !cache.is_empty() {
            let len = cache.len();
            let shed = ((len as f64 * fraction).ceil() as usize).clamp(1, len);
            evicted += cache.evict_by_priority(len - shed);
            usage = self.gauge().usage_ratio(&cache.stats());
        }

        info!(
            usage_before,
            usage_after = usage,
            swept,
            evicted,
            "memory optimization pass complete"
        );

        OptimizeOutcome {
            ran: true,
            usage_before,
            usage_after: usage,
            swept,
            evicted,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::cache::CacheOptions;
    use crate::config::Config;

    use super::*;

    /// Gauge that reports a fixed sequence of ratios, one per read.
    struct ScriptedGauge {
        ratios: Vec<f64>,
        reads: AtomicUsize,
    }

    impl ScriptedGauge {
        fn new(ratios: Vec<f64>) -> Self {
            Self {
                ratios,
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl MemoryGauge for ScriptedGauge {
        fn usage_ratio(&self, _stats: &CacheStats) -> f64 {
            let read = self.reads.fetch_add(1, Ordering::SeqCst);
            let last = self.ratios.len() - 1;
            self.ratios[read.min(last)]
        }
    }

    async fn populated_service(gauge: Arc<dyn MemoryGauge>) -> PerfService<String> {
        let service = PerfService::from_config(&Config::default()).with_memory_gauge(gauge);
        for i in 0..8 {
            service
                .cache_set(
                    format!("key{}", i),
                    "value".to_string(),
                    CacheOptions::default(),
                )
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_noop_below_threshold() {
        let gauge = Arc::new(ScriptedGauge::new(vec![0.3]));
        let service = populated_service(gauge).await;

        let outcome = service.check_and_optimize().await;

        assert!(!outcome.ran);
        assert_eq!(outcome.swept, 0);
        assert_eq!(outcome.evicted, 0);
        assert_eq!(service.cache_stats().await.total_entries, 8);
    }

    #[tokio::test]
    async fn test_sweep_alone_can_relieve_pressure() {
        // Above threshold once, below after the post-sweep re-read
        let gauge = Arc::new(ScriptedGauge::new(vec![0.9, 0.5]));
        let service = populated_service(gauge).await;

        let outcome = service.check_and_optimize().await;

        assert!(outcome.ran);
        assert_eq!(outcome.evicted, 0);
        assert_eq!(service.cache_stats().await.total_entries, 8);
    }

    #[tokio::test]
    async fn test_evicts_in_rounds_until_under_threshold() {
        // Stays above threshold for two eviction rounds, then drops
        let gauge = Arc::new(ScriptedGauge::new(vec![0.95, 0.9, 0.85, 0.4]));
        let service = populated_service(gauge).await;

        let outcome = service.check_and_optimize().await;

        assert!(outcome.ran);
        // Round one sheds ceil(8 * 0.25) = 2, round two ceil(6 * 0.25) = 2
        assert_eq!(outcome.evicted, 4);
        assert_eq!(service.cache_stats().await.total_entries, 4);
        assert_eq!(outcome.usage_after, 0.4);
    }

    #[tokio::test]
    async fn test_stops_at_empty_store() {
        // Gauge never drops: eviction must stop once the store is empty
        let gauge = Arc::new(ScriptedGauge::new(vec![0.99]));
        let service = populated_service(gauge).await;

        let outcome = service.check_and_optimize().await;

        assert!(outcome.ran);
        assert_eq!(outcome.evicted, 8);
        assert!(service.cache_stats().await.total_entries == 0);
    }

    #[tokio::test]
    async fn test_prefers_low_priority_entries() {
        let gauge = Arc::new(ScriptedGauge::new(vec![0.95, 0.9, 0.4]));
        let service = PerfService::from_config(&Config::default()).with_memory_gauge(gauge);

        for i in 0..6 {
            service
                .cache_set(
                    format!("cheap{}", i),
                    "v".to_string(),
                    CacheOptions::default(),
                )
                .await
                .unwrap();
        }
        service
            .cache_set(
                "expensive",
                "v".to_string(),
                CacheOptions {
                    ttl: None,
                    priority: Some(10),
                },
            )
            .await
            .unwrap();

        service.check_and_optimize().await;

        // High-priority entry survives the pressure pass
        assert!(service.cache_has("expensive").await);
    }

    #[tokio::test]
    async fn test_budget_gauge_ratio() {
        let gauge = BudgetGauge::new(1000);
        let mut stats = CacheStats::new();
        stats.set_estimated_bytes(800);

        assert_eq!(gauge.usage_ratio(&stats), 0.8);
    }
}
