//! Error types for the cache engines
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction, resizing and the HTTP surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity of zero supplied to construction or resize
    #[error("invalid capacity: must be greater than 0")]
    InvalidCapacity,

    /// Unrecognized eviction policy selector
    #[error("invalid eviction policy: {0}")]
    InvalidPolicy(String),

    /// Active sweeping was requested outside a Tokio runtime
    #[error("a Tokio runtime is required to run the expiration sweep")]
    NoRuntime,

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidCapacity
            | CacheError::InvalidPolicy(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NoRuntime => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engines.
pub type Result<T> = std::result::Result<T, CacheError>;
