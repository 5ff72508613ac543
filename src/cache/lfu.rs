//! LFU Engine Module
//!
//! Least Frequently Used eviction backed by a hashmap and frequency buckets.
//!
//! Each bucket is an index-linked ring of every node sharing one access count,
//! most recently touched at the front. The engine tracks the smallest
//! frequency with a non-empty bucket, and evicts from the back of that bucket:
//! least frequently used, oldest first.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::engine::{validate_capacity, Cache};
use crate::cache::list::NodeArena;
use crate::cache::CacheStats;
use crate::error::Result;

#[derive(Debug)]
struct LfuNode<V> {
    key: String,
    value: V,
    freq: u64,
}

// == LFU State ==
#[derive(Debug)]
struct LfuState<V> {
    map: HashMap<String, usize>,
    nodes: NodeArena<LfuNode<V>>,
    /// Frequency -> bucket sentinel
    buckets: HashMap<u64, usize>,
    /// Smallest frequency with a non-empty bucket, 0 when empty
    min_freq: u64,
    capacity: usize,
    stats: CacheStats,
}

impl<V> LfuState<V> {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            nodes: NodeArena::new(),
            buckets: HashMap::new(),
            min_freq: 0,
            capacity,
            stats: CacheStats::new(),
        }
    }

    fn bucket(&mut self, freq: u64) -> usize {
        match self.buckets.get(&freq) {
            Some(&sentinel) => sentinel,
            None => {
                let sentinel = self.nodes.new_list();
                self.buckets.insert(freq, sentinel);
                sentinel
            }
        }
    }

    /// Drops the bucket for `freq` if it has no nodes left. Returns whether
    /// it was dropped.
    fn release_if_empty(&mut self, freq: u64) -> bool {
        match self.buckets.get(&freq) {
            Some(&sentinel) if self.nodes.is_empty(sentinel) => {
                self.buckets.remove(&freq);
                self.nodes.drop_list(sentinel);
                true
            }
            _ => false,
        }
    }

    fn refresh_min_freq(&mut self) {
        self.min_freq = self.buckets.keys().copied().min().unwrap_or(0);
    }

    // == Touch ==
    /// Moves a node from its bucket to the front of the next one up.
    fn touch(&mut self, idx: usize) {
        let Some(freq) = self.nodes.get(idx).map(|node| node.freq) else {
            return;
        };

        self.nodes.unlink(idx);
        if self.release_if_empty(freq) && self.min_freq == freq {
            // The node moves to freq + 1, so nothing can sit lower
            self.min_freq = freq + 1;
        }

        let next = freq + 1;
        if let Some(node) = self.nodes.get_mut(idx) {
            node.freq = next;
        }
        let bucket = self.bucket(next);
        self.nodes.link_front(bucket, idx);
    }

    // == Evict ==
    /// Removes the oldest node of the minimum-frequency bucket.
    ///
    /// Leaves `min_freq` stale if that bucket empties; callers refresh it when
    /// they need it before the next insert.
    fn evict_lfu(&mut self) -> Option<String> {
        let sentinel = *self.buckets.get(&self.min_freq)?;
        let idx = self.nodes.back(sentinel)?;
        let node = self.nodes.remove(idx)?;
        self.map.remove(&node.key);
        self.release_if_empty(node.freq);
        self.stats.record_eviction();
        debug!(key = %node.key, freq = node.freq, "LFU eviction");
        Some(node.key)
    }

    fn evict_to_capacity(&mut self) {
        while self.map.len() > self.capacity {
            self.refresh_min_freq();
            if self.evict_lfu().is_none() {
                break;
            }
        }
        self.refresh_min_freq();
    }

    /// Keys and frequencies per bucket, lowest frequency first, each bucket
    /// from most to least recently touched.
    #[cfg(test)]
    fn layout(&self) -> Vec<(u64, Vec<String>)> {
        let mut freqs: Vec<u64> = self.buckets.keys().copied().collect();
        freqs.sort_unstable();
        freqs
            .into_iter()
            .map(|freq| {
                let keys = self
                    .nodes
                    .iter(self.buckets[&freq])
                    .map(|node| node.key.clone())
                    .collect();
                (freq, keys)
            })
            .collect()
    }

    /// Panics if the bucket structure disagrees with the map.
    #[cfg(test)]
    fn check_invariants(&self) {
        let mut seen = 0;
        for (&freq, &sentinel) in &self.buckets {
            assert!(!self.nodes.is_empty(sentinel), "empty bucket {} kept", freq);
            for node in self.nodes.iter(sentinel) {
                assert_eq!(node.freq, freq, "node {} in wrong bucket", node.key);
                assert!(self.map.contains_key(&node.key));
                seen += 1;
            }
        }
        assert_eq!(seen, self.map.len());
        let expected_min = self.buckets.keys().copied().min().unwrap_or(0);
        assert_eq!(self.min_freq, expected_min, "stale min_freq");
    }
}

// == LFU Cache ==
/// Least Frequently Used cache.
///
/// Frequencies start at 1 and grow by one on every `set` of an existing key
/// and every `get` hit. Ties break towards the entry touched longest ago.
#[derive(Debug)]
pub struct LfuCache<V> {
    state: RwLock<LfuState<V>>,
}

impl<V> LfuCache<V> {
    // == Constructor ==
    /// Creates an empty LFU cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            state: RwLock::new(LfuState::new(capacity)),
        })
    }

    /// Access count of `key`, without touching it.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        let state = self.state.read();
        let idx = *state.map.get(key)?;
        state.nodes.get(idx).map(|node| node.freq)
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.state.read().check_invariants();
    }
}

impl<V> Cache<V> for LfuCache<V>
where
    V: Clone + Send + Sync,
{
    fn set(&self, key: String, value: V) {
        let mut state = self.state.write();

        if let Some(&idx) = state.map.get(&key) {
            if let Some(node) = state.nodes.get_mut(idx) {
                node.value = value;
            }
            state.touch(idx);
            return;
        }

        let bucket = state.bucket(1);
        let idx = state.nodes.push_front(
            bucket,
            LfuNode {
                key: key.clone(),
                value,
                freq: 1,
            },
        );
        state.map.insert(key, idx);
        state.min_freq = 1;

        // A newcomer that is alone in bucket 1 is the victim itself
        if state.map.len() > state.capacity {
            state.evict_lfu();
            if !state.buckets.contains_key(&state.min_freq) {
                state.refresh_min_freq();
            }
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.write();

        let value = match state.map.get(key) {
            Some(&idx) => {
                state.touch(idx);
                state.nodes.get(idx).map(|node| node.value.clone())
            }
            None => None,
        };
        state.stats.record_lookup(&value);
        value
    }

    fn delete(&self, key: &str) {
        let mut state = self.state.write();

        let Some(idx) = state.map.remove(key) else {
            return;
        };
        let Some(node) = state.nodes.remove(idx) else {
            return;
        };
        if state.release_if_empty(node.freq) && state.min_freq == node.freq {
            state.refresh_min_freq();
        }
    }

    fn clear(&self) {
        let mut state = self.state.write();
        state.map.clear();
        state.buckets.clear();
        state.nodes.clear();
        state.min_freq = 0;
    }

    fn size(&self) -> usize {
        self.state.read().map.len()
    }

    fn resize(&self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;
        let mut state = self.state.write();
        state.capacity = capacity;
        state.evict_to_capacity();
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.state.read().map.contains_key(key)
    }

    fn capacity(&self) -> usize {
        self.state.read().capacity
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.read();
        state.stats.with_total_entries(state.map.len())
    }
}
