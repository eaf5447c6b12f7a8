//! Limiter Registry
//!
//! Named, independently configured sliding-window limiters. Names must be
//! registered before use; checking or inspecting an unknown name is a
//! caller error, never an implicit registration.

use std::collections::{BTreeMap, HashMap};

use crate::error::{PerfError, Result};
use crate::limiter::{LimiterDecision, LimiterStatus, RateLimiterConfig, WindowLimiter};

// == Limiter Registry ==
/// Registry of named window limiters, living for the process lifetime.
#[derive(Debug, Default)]
pub struct LimiterRegistry {
    limiters: HashMap<String, WindowLimiter>,
}

impl LimiterRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Create ==
    /// Registers or replaces the limiter for `name`.
    ///
    /// Replacing discards the previous admission log. Malformed
    /// configurations fail fast here rather than at check time.
    pub fn create(&mut self, name: &str, config: RateLimiterConfig) -> Result<()> {
        config.validate()?;
        self.limiters
            .insert(name.to_string(), WindowLimiter::new(config));
        Ok(())
    }

    // == Check ==
    /// Admission check for `name`, recording the attempt on success.
    pub fn check(&mut self, name: &str) -> Result<LimiterDecision> {
        match self.limiters.get_mut(name) {
            Some(limiter) => Ok(limiter.check()),
            None => Err(PerfError::NotConfigured(name.to_string())),
        }
    }

    // == Status ==
    /// Read-only status for `name`; never mutates the admission log.
    pub fn status(&self, name: &str) -> Result<LimiterStatus> {
        match self.limiters.get(name) {
            Some(limiter) => Ok(limiter.status()),
            None => Err(PerfError::NotConfigured(name.to_string())),
        }
    }

    // == All Statuses ==
    /// Statuses of every registered limiter, in stable name order.
    pub fn statuses(&self) -> BTreeMap<String, LimiterStatus> {
        self.limiters
            .iter()
            .map(|(name, limiter)| (name.clone(), limiter.status()))
            .collect()
    }

    /// Whether a limiter is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.limiters.contains_key(name)
    }
}
