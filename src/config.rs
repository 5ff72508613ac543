//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, EvictionPolicy, TtlConfig};
use crate::error::Result;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Eviction policy selector: `none`, `lru` or `lfu`
    pub eviction_policy: String,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1024)
    /// - `EVICTION_POLICY` - Eviction policy selector (default: lru)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    ///
    /// Unparseable numbers fall back to their defaults. The policy selector is
    /// only checked when the cache is built, see [`Config::cache_config`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            eviction_policy: env::var("EVICTION_POLICY").unwrap_or(defaults.eviction_policy),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Engine settings. Fails on an unknown policy or a zero capacity.
    pub fn cache_config(&self) -> Result<CacheConfig> {
        let policy = EvictionPolicy::from_str(&self.eviction_policy)?;
        let config = CacheConfig::new(self.max_entries, policy);
        config.validate()?;
        Ok(config)
    }

    /// TTL layer settings.
    pub fn ttl_config(&self) -> TtlConfig {
        TtlConfig::new(
            Duration::from_secs(self.default_ttl),
            Duration::from_secs(self.cleanup_interval),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            eviction_policy: EvictionPolicy::default().to_string(),
            default_ttl: 300,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
