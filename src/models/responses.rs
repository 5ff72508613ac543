//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, EvictionPolicy};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Outcome message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// False when a full no-eviction cache dropped the write
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' not stored: cache is full", key)
        };
        Self {
            message,
            key,
            stored,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Remaining lifetime of a key (GET and POST /ttl/:key)
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    /// Milliseconds until expiration
    pub ttl_ms: u64,
}

impl TtlResponse {
    pub fn new(key: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            key: key.into(),
            ttl_ms,
        }
    }
}

/// Response body for POST /resize
#[derive(Debug, Clone, Serialize)]
pub struct ResizeResponse {
    /// Capacity now in effect
    pub capacity: usize,
    /// Entries left after any evictions
    pub total_entries: usize,
}

/// Response body for DELETE /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of entries reclaimed after their TTL lapsed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Maximum number of entries
    pub capacity: usize,
    /// Active eviction policy
    pub policy: EvictionPolicy,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            capacity,
            policy,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
