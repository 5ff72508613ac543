//! Cache Module
//!
//! In-process key-value engines with no-eviction, LRU and LFU policies behind
//! one [`Cache`] contract, plus a TTL layer that wraps any of them.

mod bounded;
mod engine;
mod entry;
mod factory;
mod lfu;
mod list;
mod lru;
mod stats;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use bounded::BoundedCache;
pub use engine::{Cache, CacheConfig, EvictionPolicy};
pub use entry::TtlEntry;
pub use factory::{new_cache, new_cache_from_selector, new_ttl_cache};
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use stats::CacheStats;
pub use ttl::{TtlCache, TtlConfig, DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL};

// == Public Constants ==
/// Maximum allowed key length in bytes on the HTTP surface
pub const MAX_KEY_LENGTH: usize = 256;

/// Longest TTL an entry can carry; longer requests are clamped
pub const MAX_TTL: std::time::Duration = std::time::Duration::from_secs(100 * 365 * 24 * 60 * 60);
