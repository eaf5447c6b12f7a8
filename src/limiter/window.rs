//! Sliding Window Limiter
//!
//! Counts admissions against a rolling time window using a log of
//! admission timestamps, pruned lazily on each check.

use std::collections::VecDeque;

use serde::Serialize;

use crate::cache::current_timestamp_ms;
use crate::error::{PerfError, Result};

// == Limiter Configuration ==
/// Quota configuration for one named limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Admissions allowed within one window
    pub max_requests: usize,
    /// Window duration in milliseconds
    pub window_ms: u64,
}

impl RateLimiterConfig {
    /// Rejects unusable configurations at registration time.
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(PerfError::InvalidConfig(
                "max_requests must be greater than zero".to_string(),
            ));
        }
        if self.window_ms == 0 {
            return Err(PerfError::InvalidConfig(
                "window_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// == Limiter Decision ==
/// Outcome of one admission check.
#[derive(Debug, Clone, Copy)]
pub struct LimiterDecision {
    /// Whether the call was admitted (and logged)
    pub allowed: bool,
    /// Time until the oldest in-window admission exits the window;
    /// set only on rejection
    pub retry_after_ms: Option<u64>,
}

// == Limiter Status ==
/// Read-only projection of a limiter's current window.
#[derive(Debug, Clone, Serialize)]
pub struct LimiterStatus {
    /// Admissions still available in the current window
    pub remaining: usize,
    /// Configured quota per window
    pub total: usize,
    /// Unix-ms time at which the oldest in-window admission expires;
    /// equals "now" when the window is empty
    pub reset_at_ms: u64,
}

// == Window Limiter ==
/// One sliding-window counter.
///
/// The log holds the Unix-ms timestamps of admitted calls; an entry is
/// in-window while `timestamp > now - window_ms`. Entries are pruned
/// lazily on each admission check, never by `status`.
#[derive(Debug)]
pub struct WindowLimiter {
    config: RateLimiterConfig,
    log: VecDeque<u64>,
}

impl WindowLimiter {
    // == Constructor ==
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            log: VecDeque::new(),
        }
    }

    /// The limiter's configured quota.
    pub fn config(&self) -> RateLimiterConfig {
        self.config
    }

    // == Check ==
    /// Admission check against the current time.
    pub fn check(&mut self) -> LimiterDecision {
        self.check_at(current_timestamp_ms())
    }

    /// Admission check at an explicit instant.
    ///
    /// Prunes expired log entries, admits and records the timestamp when
    /// under quota, otherwise computes how long until the oldest in-window
    /// admission frees a slot.
    pub fn check_at(&mut self, now: u64) -> LimiterDecision {
        self.prune(now);

        if self.log.len() < self.config.max_requests {
            self.log.push_back(now);
            return LimiterDecision {
                allowed: true,
                retry_after_ms: None,
            };
        }

        // Quota exhausted: the oldest in-window entry determines the wait
        let retry_after_ms = self
            .log
            .front()
            .map(|oldest| (oldest + self.config.window_ms).saturating_sub(now).max(1))
            .unwrap_or(1);

        LimiterDecision {
            allowed: false,
            retry_after_ms: Some(retry_after_ms),
        }
    }

    // == Status ==
    /// Read-only status at the current time.
    pub fn status(&self) -> LimiterStatus {
        self.status_at(current_timestamp_ms())
    }

    /// Read-only status at an explicit instant; must not mutate the log.
    pub fn status_at(&self, now: u64) -> LimiterStatus {
        let window_start = now.saturating_sub(self.config.window_ms);
        let in_window: Vec<u64> = self
            .log
            .iter()
            .copied()
            .filter(|ts| *ts > window_start)
            .collect();

        LimiterStatus {
            remaining: self.config.max_requests.saturating_sub(in_window.len()),
            total: self.config.max_requests,
            reset_at_ms: in_window
                .first()
                .map(|oldest| oldest + self.config.window_ms)
                .unwrap_or(now),
        }
    }

    /// Drops log entries that have left the window.
    fn prune(&mut self, now: u64) {
        let window_start = now.saturating_sub(self.config.window_ms);
        while let Some(oldest) = self.log.front() {
            if *oldest <= window_start {
                self.log.pop_front();
            } else {
                break;
            }
        }
    }
}
