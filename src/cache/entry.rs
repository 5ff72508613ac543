//! TTL Entry Module
//!
//! Expiration bookkeeping for a single key in the TTL layer.

use std::time::{Duration, Instant};

use crate::cache::MAX_TTL;

// == TTL Entry ==
/// Absolute expiration instant of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlEntry {
    /// Monotonic instant at which the entry stops being visible
    pub expires_at: Instant,
}

impl TtlEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl` from now.
    ///
    /// TTLs longer than [`MAX_TTL`] are clamped.
    pub fn new(ttl: Duration) -> Self {
        Self::starting_at(Instant::now(), ttl)
    }

    /// Creates an entry expiring `ttl` after `now`.
    pub fn starting_at(now: Instant, ttl: Duration) -> Self {
        Self {
            expires_at: now + ttl.min(MAX_TTL),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: the entry is expired once the current time reaches
    /// the expiration instant, so a reported remaining TTL is never zero.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Time left before expiry, or None if the entry has expired.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        if self.is_expired_at(now) {
            None
        } else {
            Some(self.expires_at - now)
        }
    }

    // == Extend ==
    /// Pushes the expiration instant back by `extra`.
    ///
    /// The extension is relative to the current expiration instant, not to
    /// now. Returns false, leaving the entry as is, if the new instant cannot
    /// be represented.
    pub fn extend(&mut self, extra: Duration) -> bool {
        match self.expires_at.checked_add(extra) {
            Some(expires_at) => {
                self.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}
