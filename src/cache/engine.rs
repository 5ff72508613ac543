//! Engine Contract Module
//!
//! The capability set shared by every eviction policy and by the TTL layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

// == Cache Trait ==
/// Uniform contract implemented by every cache engine.
///
/// All operations are synchronous and take `&self`; each implementation guards
/// its state with its own lock, so a single instance can be shared through an
/// `Arc` across threads.
pub trait Cache<V>: Send + Sync {
    /// Stores `value` under `key`, or updates the existing entry.
    fn set(&self, key: String, value: V);

    /// Returns a clone of the value under `key`. For ordering policies this is
    /// a touch.
    fn get(&self, key: &str) -> Option<V>;

    /// Removes `key`. No-op if absent.
    fn delete(&self, key: &str);

    /// Removes every entry.
    fn clear(&self);

    /// Number of live entries.
    fn size(&self) -> usize;

    /// Changes the capacity, evicting entries as the policy dictates.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is zero,
    /// leaving the cache untouched.
    fn resize(&self, capacity: usize) -> Result<()>;

    /// Whether `key` is present, without touching its recency or frequency.
    fn contains(&self, key: &str) -> bool;

    /// Current configured capacity.
    fn capacity(&self) -> usize;

    /// Snapshot of the engine's counters.
    fn stats(&self) -> CacheStats;
}

// == Eviction Policy ==
/// Rule selecting the victim when a cache is over capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Reject new keys once full
    #[serde(alias = "none")]
    NoEviction,
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used, oldest first among ties
    Lfu,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::NoEviction => "noeviction",
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "noeviction" | "no_eviction" => Ok(EvictionPolicy::NoEviction),
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            other => Err(CacheError::InvalidPolicy(other.to_string())),
        }
    }
}

// == Cache Config ==
/// Capacity and policy for a single engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Victim selection rule
    pub eviction_policy: EvictionPolicy,
}

impl CacheConfig {
    pub fn new(max_entries: usize, eviction_policy: EvictionPolicy) -> Self {
        Self {
            max_entries,
            eviction_policy,
        }
    }

    /// Rejects a zero capacity.
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.max_entries)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            eviction_policy: EvictionPolicy::Lru,
        }
    }
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(CacheError::InvalidCapacity);
    }
    Ok(())
}
