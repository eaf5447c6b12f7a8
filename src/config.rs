//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;

use crate::error::{PerfError, Result};

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == Cache Configuration ==
/// Cache store parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
}

// == Batch Configuration ==
/// Default batch executor parameters; overridable per call.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of items per processing group
    pub batch_size: usize,
    /// Maximum concurrent producer calls within a group
    pub concurrency: usize,
    /// Pause between groups in milliseconds
    pub delay_ms: u64,
}

// == Memory Configuration ==
/// Memory monitor parameters.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Usage ratio above which optimization kicks in
    pub threshold: f64,
    /// Fraction of entries shed per eviction round under pressure
    pub eviction_fraction: f64,
    /// Byte budget the default gauge measures cache usage against
    pub budget_bytes: usize,
}

// == Config ==
/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    pub batch: BatchConfig,
    pub memory: MemoryConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background maintenance interval in seconds
    pub maintenance_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `BATCH_SIZE` - Items per batch group (default: 10)
    /// - `BATCH_CONCURRENCY` - Concurrent calls per group (default: 5)
    /// - `BATCH_DELAY_MS` - Pause between groups in ms (default: 100)
    /// - `MEMORY_THRESHOLD` - Usage ratio triggering optimization (default: 0.8)
    /// - `EVICTION_FRACTION` - Entries shed per pressure round (default: 0.25)
    /// - `MEMORY_BUDGET_BYTES` - Cache byte budget (default: 64 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAINTENANCE_INTERVAL` - Maintenance frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig {
                max_entries: env_parse("MAX_ENTRIES", 1000),
                default_ttl: env_parse("DEFAULT_TTL", 300),
            },
            batch: BatchConfig {
                batch_size: env_parse("BATCH_SIZE", 10),
                concurrency: env_parse("BATCH_CONCURRENCY", 5),
                delay_ms: env_parse("BATCH_DELAY_MS", 100),
            },
            memory: MemoryConfig {
                threshold: env_parse("MEMORY_THRESHOLD", 0.8),
                eviction_fraction: env_parse("EVICTION_FRACTION", 0.25),
                budget_bytes: env_parse("MEMORY_BUDGET_BYTES", 64 * 1024 * 1024),
            },
            server_port: env_parse("SERVER_PORT", 3000),
            maintenance_interval: env_parse("MAINTENANCE_INTERVAL", 30),
        }
    }

    /// Rejects configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_entries == 0 {
            return Err(PerfError::InvalidConfig(
                "MAX_ENTRIES must be greater than zero".to_string(),
            ));
        }
        if self.batch.batch_size == 0 || self.batch.concurrency == 0 {
            return Err(PerfError::InvalidConfig(
                "BATCH_SIZE and BATCH_CONCURRENCY must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.memory.threshold) {
            return Err(PerfError::InvalidConfig(
                "MEMORY_THRESHOLD must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.memory.eviction_fraction)
            || self.memory.eviction_fraction == 0.0
        {
            return Err(PerfError::InvalidConfig(
                "EVICTION_FRACTION must be within (0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig {
                max_entries: 1000,
                default_ttl: 300,
            },
            batch: BatchConfig {
                batch_size: 10,
                concurrency: 5,
                delay_ms: 100,
            },
            memory: MemoryConfig {
                threshold: 0.8,
                eviction_fraction: 0.25,
                budget_bytes: 64 * 1024 * 1024,
            },
            server_port: 3000,
            maintenance_interval: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.cache.default_ttl, 300);
        assert_eq!(config.batch.batch_size, 10);
        assert_eq!(config.batch.concurrency, 5);
        assert_eq!(config.batch.delay_ms, 100);
        assert_eq!(config.memory.threshold, 0.8);
        assert_eq!(config.memory.eviction_fraction, 0.25);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.maintenance_interval, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "MAX_ENTRIES",
            "DEFAULT_TTL",
            "BATCH_SIZE",
            "BATCH_CONCURRENCY",
            "BATCH_DELAY_MS",
            "MEMORY_THRESHOLD",
            "EVICTION_FRACTION",
            "MEMORY_BUDGET_BYTES",
            "SERVER_PORT",
            "MAINTENANCE_INTERVAL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.cache.default_ttl, 300);
        assert_eq!(config.memory.budget_bytes, 64 * 1024 * 1024);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_validation_rejects_zero_batch() {
        let mut config = Config::default();
        config.batch.batch_size = 0;
        assert!(matches!(
            config.validate(),
            Err(PerfError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_validation_rejects_bad_threshold() {
        let mut config = Config::default();
        config.memory.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(PerfError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_validation_rejects_full_eviction() {
        let mut config = Config::default();
        config.memory.eviction_fraction = 1.0;
        assert!(matches!(
            config.validate(),
            Err(PerfError::InvalidConfig(_))
        ));
    }
}
