//! Stats Reporter
//!
//! Read-only snapshots of the whole performance layer plus rule-based
//! optimization recommendations. Reporting never fails: missing data
//! degrades to zero values.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::{CacheStats, EstimateSize};
use crate::limiter::LimiterStatus;
use crate::metrics::PerformanceMetrics;
use crate::service::PerfService;

// == Thresholds ==
/// Cache-aside hit rate below which cache tuning is recommended.
pub const LOW_HIT_RATE: f64 = 0.5;

/// Average producer latency (ms) above which a performance investigation
/// is recommended.
pub const SLOW_RESPONSE_MS: f64 = 2000.0;

/// Error rate above which a reliability investigation is recommended.
pub const HIGH_ERROR_RATE: f64 = 0.05;

// == Performance Report ==
/// Point-in-time snapshot across metrics, cache, and limiters.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub metrics: PerformanceMetrics,
    /// Cache-aside hit rate derived from the metrics counters
    pub request_hit_rate: f64,
    /// Producer error rate derived from the metrics counters
    pub error_rate: f64,
    pub cache: CacheStats,
    /// Store-level hit rate (every `get`, not just cache-aside traffic)
    pub cache_hit_rate: f64,
    pub limiters: BTreeMap<String, LimiterStatus>,
}

// == Recommendations ==
/// Category tag for one recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Cache,
    Performance,
    Reliability,
}

/// One threshold rule that fired.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
}

/// Applies the threshold rules to a metrics snapshot.
///
/// Rules are independent; any subset may fire. A quiet process (no
/// traffic yet) produces no recommendations.
pub fn recommendations_for(metrics: &PerformanceMetrics) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let lookups = metrics.cache_hits + metrics.cache_misses;
    if lookups > 0 && metrics.hit_rate() < LOW_HIT_RATE {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Cache,
            message: format!(
                "Cache hit rate is {:.0}%; consider longer TTLs or caching more request types",
                metrics.hit_rate() * 100.0
            ),
        });
    }

    if metrics.avg_response_time_ms > SLOW_RESPONSE_MS {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Performance,
            message: format!(
                "Average response time is {:.0}ms; investigate slow upstream calls",
                metrics.avg_response_time_ms
            ),
        });
    }

    if metrics.error_rate() > HIGH_ERROR_RATE {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Reliability,
            message: format!(
                "Error rate is {:.1}%; add retry or backoff around failing calls",
                metrics.error_rate() * 100.0
            ),
        });
    }

    recommendations
}

impl<V: Clone + EstimateSize> PerfService<V> {
    // == Performance Report ==
    /// Snapshot of process metrics, cache stats, and every limiter.
    pub async fn performance_report(&self) -> PerformanceReport {
        let metrics = self.metrics().await;
        let cache = self.cache_stats().await;
        let limiters = self.limiters_handle().read().await.statuses();

        PerformanceReport {
            request_hit_rate: metrics.hit_rate(),
            error_rate: metrics.error_rate(),
            cache_hit_rate: cache.hit_rate(),
            metrics,
            cache,
            limiters,
        }
    }

    // == Recommendations ==
    /// Threshold-rule recommendations from the current metrics.
    pub async fn recommendations(&self) -> Vec<Recommendation> {
        recommendations_for(&self.metrics().await)
    }
}
