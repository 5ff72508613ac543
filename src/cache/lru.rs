//! LRU Engine Module
//!
//! Least Recently Used eviction backed by a hashmap and an index-linked
//! recency list.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::engine::{validate_capacity, Cache};
use crate::cache::list::NodeArena;
use crate::cache::CacheStats;
use crate::error::Result;

#[derive(Debug)]
struct LruNode<V> {
    key: String,
    value: V,
}

// == LRU State ==
/// Map and recency list guarded together by the engine lock.
///
/// Walking the list from its sentinel visits keys from most to least recently
/// touched. The map and the list always hold the same key set.
#[derive(Debug)]
struct LruState<V> {
    map: HashMap<String, usize>,
    nodes: NodeArena<LruNode<V>>,
    /// Sentinel of the recency ring
    order: usize,
    capacity: usize,
    stats: CacheStats,
}

impl<V> LruState<V> {
    fn new(capacity: usize) -> Self {
        let mut nodes = NodeArena::new();
        let order = nodes.new_list();
        Self {
            map: HashMap::new(),
            nodes,
            order,
            capacity,
            stats: CacheStats::new(),
        }
    }

    // == Evict Oldest ==
    /// Removes the least recently touched entry.
    fn evict_oldest(&mut self) -> Option<String> {
        let idx = self.nodes.back(self.order)?;
        let node = self.nodes.remove(idx)?;
        self.map.remove(&node.key);
        self.stats.record_eviction();
        debug!(key = %node.key, "LRU eviction");
        Some(node.key)
    }

    fn evict_to_capacity(&mut self) {
        while self.map.len() > self.capacity {
            if self.evict_oldest().is_none() {
                break;
            }
        }
    }

    /// Keys ordered from most to least recently used.
    #[cfg(test)]
    fn keys(&self) -> Vec<String> {
        self.nodes
            .iter(self.order)
            .map(|node| node.key.clone())
            .collect()
    }
}

// == LRU Cache ==
/// Least Recently Used cache.
///
/// Both `set` and `get` count as a touch and move the entry to the front of
/// the recency list. At most one entry is evicted per insertion.
#[derive(Debug)]
pub struct LruCache<V> {
    state: RwLock<LruState<V>>,
}

impl<V> LruCache<V> {
    // == Constructor ==
    /// Creates an empty LRU cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            state: RwLock::new(LruState::new(capacity)),
        })
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub(crate) fn recency_order(&self) -> Vec<String> {
        self.state.read().keys()
    }
}

impl<V> Cache<V> for LruCache<V>
where
    V: Clone + Send + Sync,
{
    fn set(&self, key: String, value: V) {
        let mut state = self.state.write();
        let state = &mut *state;

        if let Some(&idx) = state.map.get(&key) {
            if let Some(node) = state.nodes.get_mut(idx) {
                node.value = value;
            }
            state.nodes.move_to_front(state.order, idx);
            return;
        }

        let idx = state.nodes.push_front(
            state.order,
            LruNode {
                key: key.clone(),
                value,
            },
        );
        state.map.insert(key, idx);

        if state.map.len() > state.capacity {
            state.evict_oldest();
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        // Exclusive for the whole lookup: the touch reorders the list.
        let mut state = self.state.write();
        let state = &mut *state;

        let value = match state.map.get(key) {
            Some(&idx) => {
                state.nodes.move_to_front(state.order, idx);
                state.nodes.get(idx).map(|node| node.value.clone())
            }
            None => None,
        };
        state.stats.record_lookup(&value);
        value
    }

    fn delete(&self, key: &str) {
        let mut state = self.state.write();
        if let Some(idx) = state.map.remove(key) {
            state.nodes.remove(idx);
        }
    }

    fn clear(&self) {
        let mut state = self.state.write();
        state.map.clear();
        state.nodes.clear();
        state.order = state.nodes.new_list();
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
