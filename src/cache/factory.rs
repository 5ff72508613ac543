//! Cache Factory Module
//!
//! Turns a policy selector and a capacity into a concrete engine.

use tracing::info;

use crate::cache::engine::Cache;
use crate::cache::{
    BoundedCache, CacheConfig, EvictionPolicy, LfuCache, LruCache, TtlCache, TtlConfig,
};
use crate::error::Result;

/// Builds the engine selected by `config`.
///
/// Fails with `InvalidCapacity` when `max_entries` is zero.
pub fn new_cache<V>(config: &CacheConfig) -> Result<Box<dyn Cache<V>>>
where
    V: Clone + Send + Sync + 'static,
{
    config.validate()?;

    let cache: Box<dyn Cache<V>> = match config.eviction_policy {
        EvictionPolicy::NoEviction => Box::new(BoundedCache::new(config.max_entries)?),
        EvictionPolicy::Lru => Box::new(LruCache::new(config.max_entries)?),
        EvictionPolicy::Lfu => Box::new(LfuCache::new(config.max_entries)?),
    };

    info!(
        policy = %config.eviction_policy,
        capacity = config.max_entries,
        "cache engine created"
    );
    Ok(cache)
}

/// Builds an engine from a textual policy selector such as `"lru"`.
///
/// Fails with `InvalidPolicy` for an unknown selector.
pub fn new_cache_from_selector<V>(policy: &str, max_entries: usize) -> Result<Box<dyn Cache<V>>>
where
    V: Clone + Send + Sync + 'static,
{
    let config = CacheConfig::new(max_entries, policy.parse()?);
    new_cache(&config)
}

/// Builds the engine selected by `config` and wraps it in a TTL layer.
pub fn new_ttl_cache<V>(config: &CacheConfig, ttl: TtlConfig) -> Result<TtlCache<V>>
where
    V: Clone + Send + Sync + 'static,
{
    TtlCache::new(new_cache(config)?, ttl)
}
