//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Checks a key taken from a body or a path segment.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `ttl`: Optional TTL in seconds (uses default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(error) = validate_key(&self.key) {
            return Some(error);
        }
        if self.ttl == Some(0) {
            return Some("TTL must be at least 1 second".to_string());
        }
        None
    }
}

/// Request body for extending a TTL (POST /ttl/:key)
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendTtlRequest {
    /// Seconds added to the current expiration
    pub seconds: u64,
}

/// Request body for changing the capacity (POST /resize)
#[derive(Debug, Clone, Deserialize)]
pub struct ResizeRequest {
    pub capacity: usize,
}
