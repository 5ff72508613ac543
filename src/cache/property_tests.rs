//! Property-Based Tests for Cache Module
//!
//! Drives every engine with random operation sequences and compares it against
//! a plain reference model.

use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::cache::{
    new_cache, BoundedCache, Cache, CacheConfig, EvictionPolicy, LfuCache, LruCache, TtlCache,
    TtlConfig,
};

// == Strategies ==
/// Small key space so that sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn policy_strategy() -> impl Strategy<Value = EvictionPolicy> {
    prop_oneof![
        Just(EvictionPolicy::NoEviction),
        Just(EvictionPolicy::Lru),
        Just(EvictionPolicy::Lfu),
    ]
}

fn apply(cache: &dyn Cache<u32>, op: &CacheOp) -> Option<u32> {
    match op {
        CacheOp::Set { key, value } => {
            cache.set(key.clone(), *value);
            None
        }
        CacheOp::Get { key } => cache.get(key),
        CacheOp::Delete { key } => {
            cache.delete(key);
            None
        }
    }
}

// == Reference Models ==
/// Recency list, most recently used first.
struct LruModel {
    capacity: usize,
    order: VecDeque<(String, u32)>,
}

impl LruModel {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::new(),
        }
    }

    fn take(&mut self, key: &str) -> Option<(String, u32)> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        self.order.remove(pos)
    }

    fn apply(&mut self, op: &CacheOp) -> Option<u32> {
        match op {
            CacheOp::Set { key, value } => {
                self.take(key);
                self.order.push_front((key.clone(), *value));
                self.order.truncate(self.capacity);
                None
            }
            CacheOp::Get { key } => {
                let entry = self.take(key)?;
                let value = entry.1;
                self.order.push_front(entry);
                Some(value)
            }
            CacheOp::Delete { key } => {
                self.take(key);
                None
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(k, _)| k.clone()).collect()
    }
}

/// Frequency plus the logical time of the last touch for every key.
struct LfuModel {
    capacity: usize,
    clock: u64,
    entries: HashMap<String, (u32, u64, u64)>,
}

impl LfuModel {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            clock: 0,
            entries: HashMap::new(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn apply(&mut self, op: &CacheOp) -> Option<u32> {
        match op {
            CacheOp::Set { key, value } => {
                let now = self.tick();
                if let Some(entry) = self.entries.get_mut(key) {
                    *entry = (*value, entry.1 + 1, now);
                    return None;
                }
                self.entries.insert(key.clone(), (*value, 1, now));
                if self.entries.len() > self.capacity {
                    let victim = self
                        .entries
                        .iter()
                        .min_by_key(|(_, (_, freq, touched))| (*freq, *touched))
                        .map(|(k, _)| k.clone());
                    if let Some(victim) = victim {
                        self.entries.remove(&victim);
                    }
                }
                None
            }
            CacheOp::Get { key } => {
                let now = self.tick();
                let entry = self.entries.get_mut(key)?;
                entry.1 += 1;
                entry.2 = now;
                Some(entry.0)
            }
            CacheOp::Delete { key } => {
                self.entries.remove(key);
                None
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Size never exceeds capacity while no resize happens
    #[test]
    fn prop_size_bounded_by_capacity(
        policy in policy_strategy(),
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let cache = new_cache::<u32>(&CacheConfig::new(capacity, policy)).unwrap();
        for op in &ops {
            apply(cache.as_ref(), op);
            prop_assert!(cache.size() <= capacity);
        }
    }

    // Overwriting a present key never changes the size
    #[test]
    fn prop_update_does_not_grow(
        policy in policy_strategy(),
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 0..40),
        value in any::<u32>(),
    ) {
        let cache = new_cache::<u32>(&CacheConfig::new(capacity, policy)).unwrap();
        for op in &ops {
            apply(cache.as_ref(), op);
        }
        cache.set("z".to_string(), 0);
        prop_assume!(cache.contains("z"));

        let before = cache.size();
        cache.set("z".to_string(), value);
        prop_assert_eq!(cache.size(), before);
        prop_assert_eq!(cache.get("z"), Some(value));
    }

    // Hits plus misses equals the number of gets issued
    #[test]
    fn prop_stats_count_every_lookup(
        policy in policy_strategy(),
        ops in prop::collection::vec(cache_op_strategy(), 1..60),
    ) {
        let cache = new_cache::<u32>(&CacheConfig::new(3, policy)).unwrap();
        let mut hits = 0u64;
        let mut misses = 0u64;
        for op in &ops {
            let found = apply(cache.as_ref(), op);
            if matches!(op, CacheOp::Get { .. }) {
                if found.is_some() { hits += 1 } else { misses += 1 }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.total_entries, cache.size());
    }

    #[test]
    fn prop_bounded_matches_hashmap(
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let cache = BoundedCache::<u32>::new(capacity).unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in &ops {
            let expected = match op {
                CacheOp::Set { key, value } => {
                    if model.contains_key(key) || model.len() < capacity {
                        model.insert(key.clone(), *value);
                    }
                    None
                }
                CacheOp::Get { key } => model.get(key).copied(),
                CacheOp::Delete { key } => {
                    model.remove(key);
                    None
                }
            };
            prop_assert_eq!(apply(&cache, op), expected);
        }
        prop_assert_eq!(cache.size(), model.len());
    }

    #[test]
    fn prop_lru_matches_recency_model(
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let cache = LruCache::<u32>::new(capacity).unwrap();
        let mut model = LruModel::new(capacity);

        for op in &ops {
            prop_assert_eq!(apply(&cache, op), model.apply(op), "{:?}", op);
            prop_assert_eq!(cache.recency_order(), model.keys());
        }
    }

    #[test]
    fn prop_lfu_matches_frequency_model(
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let cache = LfuCache::<u32>::new(capacity).unwrap();
        let mut model = LfuModel::new(capacity);

        for op in &ops {
            prop_assert_eq!(apply(&cache, op), model.apply(op), "{:?}", op);
            cache.assert_consistent();
        }
        for (key, (_, freq, _)) in &model.entries {
            prop_assert_eq!(cache.frequency(key), Some(*freq));
        }
        prop_assert_eq!(cache.size(), model.entries.len());
    }

    // Shrinking keeps the structure consistent and the size within bounds
    #[test]
    fn prop_lfu_resize_stays_consistent(
        ops in prop::collection::vec(cache_op_strategy(), 1..60),
        shrink_to in 1usize..4,
    ) {
        let cache = LfuCache::<u32>::new(6).unwrap();
        for op in &ops {
            apply(&cache, op);
        }
        cache.resize(shrink_to).unwrap();
        cache.assert_consistent();
        prop_assert!(cache.size() <= shrink_to);

        for op in &ops {
            apply(&cache, op);
            cache.assert_consistent();
            prop_assert!(cache.size() <= shrink_to);
        }
    }

    // With a TTL nothing outlives, the decorator is transparent
    #[test]
    fn prop_ttl_decorator_is_transparent(
        policy in policy_strategy(),
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..60),
    ) {
        let config = CacheConfig::new(capacity, policy);
        let plain = new_cache::<u32>(&config).unwrap();
        let wrapped = TtlCache::new(
            new_cache::<u32>(&config).unwrap(),
            TtlConfig::without_sweep(Duration::from_secs(3600)),
        )
        .unwrap();

        for op in &ops {
            prop_assert_eq!(apply(&wrapped, op), apply(plain.as_ref(), op), "{:?}", op);
        }
        for key in ["a", "b", "c", "d", "e", "f"] {
            prop_assert_eq!(wrapped.contains(key), plain.contains(key));
        }

        let (wrapped_stats, plain_stats) = (wrapped.stats(), plain.stats());
        prop_assert_eq!(wrapped_stats.hits, plain_stats.hits);
        prop_assert_eq!(wrapped_stats.misses, plain_stats.misses);
        prop_assert_eq!(wrapped_stats.evictions, plain_stats.evictions);
    }

    // Extending a live key always pushes its remaining TTL forward
    #[test]
    fn prop_extend_ttl_adds_time(base_secs in 10u64..1000, extra_secs in 1u64..1000) {
        let cache = TtlCache::<u32>::new(
            Box::new(LruCache::<u32>::new(4).unwrap()),
            TtlConfig::without_sweep(Duration::from_secs(60)),
        )
        .unwrap();
        cache.set_with_ttl("k".to_string(), 1, Duration::from_secs(base_secs));

        let before = cache.get_ttl("k").unwrap();
        prop_assert!(cache.extend_ttl("k", Duration::from_secs(extra_secs)));
        let after = cache.get_ttl("k").unwrap();

        prop_assert!(after > before);
        prop_assert!(after <= Duration::from_secs(base_secs + extra_secs));
        prop_assert!(after + Duration::from_secs(1) >= Duration::from_secs(base_secs + extra_secs));
    }
}
