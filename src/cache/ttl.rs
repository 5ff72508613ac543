//! TTL Layer Module
//!
//! Decorator adding per-key expiration on top of any [`Cache`] engine.
//!
//! Expired entries are reclaimed two ways: lazily, when a `get` finds its
//! record lapsed, and actively, by a background sweep running on a fixed
//! interval. The wrapped engine keeps its own eviction bookkeeping and never
//! sees TTLs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::engine::Cache;
use crate::cache::{CacheStats, TtlEntry};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, Sweep};

/// TTL applied by `set` when no default is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Sweep interval used by [`TtlConfig::default`].
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

// == TTL Config ==
/// Expiration settings for a [`TtlCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlConfig {
    /// TTL applied by `set`. Zero selects [`DEFAULT_TTL`].
    pub default_ttl: Duration,
    /// Period of the background sweep. Zero disables it.
    pub cleanup_interval: Duration,
}

impl TtlConfig {
    pub fn new(default_ttl: Duration, cleanup_interval: Duration) -> Self {
        Self {
            default_ttl,
            cleanup_interval,
        }
    }

    /// Lazy expiration only.
    pub fn without_sweep(default_ttl: Duration) -> Self {
        Self::new(default_ttl, Duration::ZERO)
    }
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CLEANUP_INTERVAL)
    }
}

// == Shared State ==
struct TtlState<V> {
    inner: Box<dyn Cache<V>>,
    entries: HashMap<String, TtlEntry>,
    default_ttl: Duration,
    /// Misses and expirations answered here without reaching the wrapped engine
    stats: CacheStats,
}

impl<V> TtlState<V> {
    fn live_count(&self, now: Instant) -> usize {
        self.entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired_at(now) && self.inner.contains(key))
            .count()
    }

    /// Drops records whose value the wrapped engine already evicted.
    fn prune_orphans(&mut self) -> usize {
        let before = self.entries.len();
        let inner = &self.inner;
        self.entries.retain(|key, _| inner.contains(key));
        before - self.entries.len()
    }

    /// Drops a record and the wrapped value together.
    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        self.inner.delete(key);
    }
}

/// State reachable from both the handle and the sweep task.
struct TtlCore<V> {
    state: RwLock<TtlState<V>>,
}

impl<V: 'static> Sweep for TtlCore<V> {
    fn purge_expired(&self) -> usize {
        let mut state = self.state.write();
        let now = Instant::now();

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            state.forget(key);
        }
        state.stats.record_expirations(expired.len());

        let orphans = state.prune_orphans();
        if orphans > 0 {
            debug!(orphans, "TTL sweep: dropped records evicted by the wrapped cache");
        }

        expired.len()
    }
}

struct Sweeper {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

// == TTL Cache ==
/// Expiration layer over a wrapped engine.
///
/// Every operation takes this layer's lock before the wrapped engine's, and
/// removals from the TTL records and the wrapped engine happen under one
/// critical section.
///
/// Records of keys the wrapped engine evicts on its own linger until the next
/// `get`, resize or sweep of that key, but never count towards
/// [`TtlCache::size`].
pub struct TtlCache<V> {
    core: Arc<TtlCore<V>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Wraps `inner`, taking exclusive ownership of it.
    ///
    /// A non-zero `cleanup_interval` spawns the sweep onto the current Tokio
    /// runtime and fails with [`CacheError::NoRuntime`] outside of one.
    pub fn new(inner: Box<dyn Cache<V>>, config: TtlConfig) -> Result<Self> {
        let default_ttl = if config.default_ttl.is_zero() {
            DEFAULT_TTL
        } else {
            config.default_ttl
        };

        let core = Arc::new(TtlCore {
            state: RwLock::new(TtlState {
                inner,
                entries: HashMap::new(),
                default_ttl,
                stats: CacheStats::new(),
            }),
        });

        let sweeper = if config.cleanup_interval.is_zero() {
            None
        } else {
            tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
            let (stop, stop_rx) = watch::channel(false);
            let handle =
                spawn_cleanup_task(Arc::downgrade(&core), config.cleanup_interval, stop_rx);
            Some(Sweeper { stop, handle })
        };

        Ok(Self {
            core,
            sweeper: Mutex::new(sweeper),
        })
    }

    // == Set With TTL ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Returns false when the wrapped engine refused the write (a full
    /// no-eviction cache); no TTL record is kept for the key in that case.
    pub fn set_with_ttl(&self, key: String, value: V, ttl: Duration) -> bool {
        let mut state = self.core.state.write();
        let entry = TtlEntry::new(ttl);

        state.inner.set(key.clone(), value);
        if state.inner.contains(&key) {
            state.entries.insert(key, entry);
            true
        } else {
            state.entries.remove(&key);
            warn!(key = %key, "write rejected by the wrapped cache");
            false
        }
    }

    // == Get TTL ==
    /// Time left before `key` expires. None if absent or already expired.
    pub fn get_ttl(&self, key: &str) -> Option<Duration> {
        self.core.state.read().entries.get(key)?.remaining()
    }

    // == Extend TTL ==
    /// Pushes back the expiration of a live key by `extra`, measured from its
    /// current expiration instant.
    ///
    /// Returns false, changing nothing, if the key is absent or expired.
    pub fn extend_ttl(&self, key: &str, extra: Duration) -> bool {
        let mut state = self.core.state.write();
        match state.entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => entry.extend(extra),
            _ => false,
        }
    }

    /// TTL applied by [`Cache::set`].
    pub fn default_ttl(&self) -> Duration {
        self.core.state.read().default_ttl
    }

    /// Whether the background sweep is still running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|sweeper| !sweeper.handle.is_finished())
    }
}

impl<V> TtlCache<V> {
    // == Stop ==
    /// Halts the background sweep.
    ///
    /// Idempotent and non-blocking. The sweep task notices at its next tick
    /// boundary; a sweep already running finishes first. Lazy expiration on
    /// `get` keeps working afterwards.
    pub fn stop(&self) {
        if let Some(sweeper) = self.sweeper.lock().take() {
            sweeper.stop.send_replace(true);
            info!("TTL sweep stop requested");
        }
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<V> Cache<V> for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn set(&self, key: String, value: V) {
        let ttl = self.default_ttl();
        self.set_with_ttl(key, value, ttl);
    }

    fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.core.state.write();
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                state.stats.record_miss();
                return None;
            }
        };

        if expired {
            state.forget(key);
            state.stats.record_expirations(1);
            state.stats.record_miss();
            debug!(key = %key, "lazy expiration");
            return None;
        }

        let value = state.inner.get(key);
        if value.is_none() {
            // Evicted by the wrapped engine's own policy
            state.entries.remove(key);
        }
        value
    }

    fn delete(&self, key: &str) {
        self.core.state.write().forget(key);
    }

    fn clear(&self) {
        let mut state = self.core.state.write();
        state.entries.clear();
        state.inner.clear();
    }

    fn size(&self) -> usize {
        self.core.state.read().live_count(Instant::now())
    }

    fn resize(&self, capacity: usize) -> Result<()> {
        let mut state = self.core.state.write();
        state.inner.resize(capacity)?;
        state.prune_orphans();
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        let state = self.core.state.read();
        match state.entries.get(key) {
            Some(entry) => !entry.is_expired() && state.inner.contains(key),
            None => false,
        }
    }

    fn capacity(&self) -> usize {
        self.core.state.read().inner.capacity()
    }

    fn stats(&self) -> CacheStats {
        let state = self.core.state.read();
        let mut stats = state.inner.stats();
        stats.misses += state.stats.misses;
        stats.expirations += state.stats.expirations;
        stats.total_entries = state.live_count(Instant::now());
        stats
    }
}
