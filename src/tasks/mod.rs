//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the caches.
//!
//! # Tasks
//! - TTL Sweep: Removes expired entries at a configured interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, Sweep};
