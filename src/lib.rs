//! littlecache - in-process key-value caches with pluggable eviction
//!
//! Bounded, LRU and LFU engines share the [`cache::Cache`] contract. Any of
//! them can be wrapped in a [`cache::TtlCache`] for per-entry expiration with
//! an optional background sweep. A small HTTP server exposes one such cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{
    new_cache, new_ttl_cache, BoundedCache, Cache, CacheConfig, CacheStats, EvictionPolicy,
    LfuCache, LruCache, TtlCache, TtlConfig,
};
pub use config::Config;
pub use error::{CacheError, Result};
