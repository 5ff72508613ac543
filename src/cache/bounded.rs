//! Bounded Map Module
//!
//! The no-eviction baseline: a capacity-limited map that rejects new keys once
//! full.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::engine::{validate_capacity, Cache};
use crate::cache::CacheStats;
use crate::error::Result;

#[derive(Debug)]
struct BoundedState<V> {
    entries: HashMap<String, V>,
    capacity: usize,
}

// == Bounded Cache ==
/// Capacity-bounded map with reject-on-full semantics.
///
/// Overwrites always succeed. New keys are silently dropped while the map is
/// at capacity. There is no ordering structure, so a downward resize never
/// evicts and the size may exceed the capacity until entries are deleted.
#[derive(Debug)]
pub struct BoundedCache<V> {
    state: RwLock<BoundedState<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> BoundedCache<V> {
    // == Constructor ==
    /// Creates an empty map holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            state: RwLock::new(BoundedState {
                entries: HashMap::new(),
                capacity,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }
}

impl<V> Cache<V> for BoundedCache<V>
where
    V: Clone + Send + Sync,
{
    fn set(&self, key: String, value: V) {
        let mut state = self.state.write();

        if let Some(existing) = state.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        if state.entries.len() >= state.capacity {
            debug!(key = %key, capacity = state.capacity, "cache full, dropping write");
            return;
        }

        state.entries.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<V> {
        // Nothing to reorder, so lookups share the lock.
        let value = self.state.read().entries.get(key).cloned();
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    fn delete(&self, key: &str) {
        self.state.write().entries.remove(key);
    }

    fn clear(&self) {
        self.state.write().entries.clear();
    }

    fn size(&self) -> usize {
        self.state.read().entries.len()
    }

    fn resize(&self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;
        self.state.write().capacity = capacity;
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.state.read().entries.contains_key(key)
    }

    fn capacity(&self) -> usize {
        self.state.read().capacity
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            total_entries: self.size(),
            ..CacheStats::default()
        }
    }
}
