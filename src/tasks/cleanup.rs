//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::MAX_TTL;

/// Something holding entries that can lapse.
pub trait Sweep: Send + Sync + 'static {
    /// Removes every expired entry and returns how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Spawns a background task that sweeps `target` every `interval`.
///
/// The first sweep happens one full interval after spawning. The task exits
/// when `stop` flips to true or its sender is dropped, or once `target` has
/// been dropped. Both are only observed between sweeps, so a sweep in progress
/// always runs to completion.
///
/// Intervals longer than [`MAX_TTL`] are clamped to it.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_cleanup_task<S: Sweep>(
    target: Weak<S>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = interval.min(MAX_TTL);
    tokio::spawn(async move {
        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "TTL sweep started"
        );

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                _ = ticker.tick() => {}
            }

            if *stop.borrow() {
                break;
            }
            let Some(target) = target.upgrade() else {
                break;
            };

            let removed = target.purge_expired();
            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }

        info!("TTL sweep stopped");
    })
}
