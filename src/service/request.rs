//! Request Executors
//!
//! The cache-aside and rate-limited wrappers around caller-supplied
//! producer functions. Producers are opaque asynchronous operations; the
//! executors only add cache and quota bookkeeping around them.

use std::future::Future;
use std::time::Instant;

use crate::cache::{CacheOptions, EstimateSize};
use crate::error::{PerfError, Result};
use crate::service::PerfService;

impl<V: Clone + EstimateSize> PerfService<V> {
    // == Cache-Aside Executor ==
    /// Returns the cached value for `key`, producing and caching it on a
    /// miss.
    ///
    /// On a hit the producer is not invoked. On a miss the producer runs
    /// once and its success is stored under `key`; a producer failure
    /// propagates to the caller and nothing is cached.
    ///
    /// Concurrent misses for the same key are not deduplicated: each
    /// missing caller invokes its own producer and the last completed
    /// write wins. Callers needing single-flight semantics must layer
    /// their own in-flight tracking above this.
    pub async fn cached_request<F, Fut>(
        &self,
        key: &str,
        options: CacheOptions,
        producer: F,
    ) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        // Lookup and release the lock before any producer work
        let cached = self.cache_handle().write().await.get(key);
        if let Some(value) = cached {
            self.metrics_handle().write().await.record_cache_hit();
            return Ok(value);
        }
        self.metrics_handle().write().await.record_cache_miss();

        let value = producer().await.map_err(PerfError::Producer)?;

        self.cache_handle()
            .write()
            .await
            .set(key.to_string(), value.clone(), options)?;
        Ok(value)
    }

    // == Rate-Limited Executor ==
    /// Runs the producer under the named limiter's quota.
    ///
    /// Over-budget calls fail with [`PerfError::RateLimitExceeded`] before
    /// the producer is invoked. Admitted calls count toward `api_calls`
    /// and the latency average whether or not the producer succeeds; the
    /// admission is not refunded on failure. Producer errors additionally
    /// count toward `errors` and propagate unchanged.
    pub async fn rate_limited_request<F, Fut, T>(&self, name: &str, producer: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let decision = self.limiters_handle().write().await.check(name)?;
        if !decision.allowed {
            return Err(PerfError::RateLimitExceeded {
                name: name.to_string(),
                retry_after_ms: decision.retry_after_ms.unwrap_or(1),
            });
        }

        let start = Instant::now();
        let outcome = producer().await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut metrics = self.metrics_handle().write().await;
        metrics.record_api_call(latency_ms);
        match outcome {
            Ok(value) => Ok(value),
            Err(error) => {
                metrics.record_error();
                Err(PerfError::Producer(error))
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::config::Config;
    use crate::limiter::RateLimiterConfig;

    use super::*;

    fn service() -> PerfService<String> {
        PerfService::from_config(&Config::default())
    }

    #[tokio::test]
    async fn test_cached_request_invokes_producer_once() {
        let service = service();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let value = service
                .cached_request("playlist:daily", CacheOptions::default(), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("tracks".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "tracks");
        }

        // First call misses, the rest are served from the cache
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let metrics = service.metrics().await;
        assert_eq!(metrics.cache_misses, 1);
        assert_eq!(metrics.cache_hits, 2);
    }

    #[tokio::test]
    async fn test_cached_request_failure_not_cached() {
        let service = service();
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let calls = Arc::clone(&calls);
            service
                .cached_request("flaky", CacheOptions::default(), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow::anyhow!("upstream 503"))
                })
                .await
        };
        assert!(matches!(failing, Err(PerfError::Producer(_))));
        assert!(!service.cache_has("flaky").await);

        // Next call invokes the producer again: the failure was not cached
        let calls_clone = Arc::clone(&calls);
        let value = service
            .cached_request("flaky", CacheOptions::default(), move || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok("recovered".to_string())
            })
            .await
            .unwrap();

        assert_eq!(value, "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_request_concurrent_misses_not_deduplicated() {
        let service = service();
        let calls = Arc::new(AtomicUsize::new(0));

        // Two simultaneous misses for one key: both producers may run.
        // This pins the documented no-single-flight behavior.
        let first = {
            let service = service.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                service
                    .cached_request("shared", CacheOptions::default(), move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        Ok("a".to_string())
                    })
                    .await
            })
        };
        let second = {
            let service = service.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                service
                    .cached_request("shared", CacheOptions::default(), move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        Ok("b".to_string())
                    })
                    .await
            })
        };

        assert!(first.await.unwrap().is_ok());
        assert!(second.await.unwrap().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Whichever write won, the cache holds a complete value
        let value = service.cache_get("shared").await.unwrap();
        assert!(value == "a" || value == "b");
    }

    #[tokio::test]
    async fn test_rate_limited_request_rejects_without_invoking() {
        let service = service();
        service
            .create_limiter(
                "spotify",
                RateLimiterConfig {
                    max_requests: 1,
                    window_ms: 60_000,
                },
            )
            .await
            .unwrap();

        let ok: String = service
            .rate_limited_request("spotify", || async { Ok("ok".to_string()) })
            .await
            .unwrap();
        assert_eq!(ok, "ok");

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let rejected: Result<String> = service
            .rate_limited_request("spotify", move || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok("never".to_string())
            })
            .await;

        match rejected {
            Err(PerfError::RateLimitExceeded { retry_after_ms, .. }) => {
                assert!(retry_after_ms > 0);
            }
            other => panic!("expected RateLimitExceeded, got {:?}", other.map(|_| ())),
        }
        // The producer must not have run
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_request_unknown_name() {
        let service = service();

        let result: Result<String> = service
            .rate_limited_request("unregistered", || async { Ok("x".to_string()) })
            .await;

        assert!(matches!(result, Err(PerfError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_rate_limited_request_records_metrics() {
        let service = service();
        service
            .create_limiter(
                "spotify",
                RateLimiterConfig {
                    max_requests: 10,
                    window_ms: 60_000,
                },
            )
            .await
            .unwrap();

        let _: String = service
            .rate_limited_request("spotify", || async { Ok("ok".to_string()) })
            .await
            .unwrap();
        let failed: Result<String> = service
            .rate_limited_request("spotify", || async { Err(anyhow::anyhow!("boom")) })
            .await;
        assert!(failed.is_err());

        let metrics = service.metrics().await;
        // Failures still consume an admission and count as calls
        assert_eq!(metrics.api_calls, 2);
        assert_eq!(metrics.errors, 1);
        let status = service.limiter_status("spotify").await.unwrap();
        assert_eq!(status.remaining, 8);
    }
}
