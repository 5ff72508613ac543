//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! expirations.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups (key absent or expired)
    pub misses: u64,
    /// Number of entries removed by the eviction policy
    pub evictions: u64,
    /// Number of entries reclaimed because their TTL lapsed
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Lookup Helper ==
    /// Records a hit or a miss depending on whether the lookup found a value.
    pub fn record_lookup<T>(&mut self, found: &Option<T>) {
        if found.is_some() {
            self.record_hit();
        } else {
            self.record_miss();
        }
    }

    /// Returns a copy carrying the given entry count.
    pub fn with_total_entries(&self, count: usize) -> Self {
        Self {
            total_entries: count,
            ..self.clone()
        }
    }
}
