//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::cache::{new_ttl_cache, Cache, EvictionPolicy, TtlCache, MAX_TTL};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, ExtendTtlRequest, GetResponse, HealthResponse,
    ResizeRequest, ResizeResponse, SetRequest, SetResponse, StatsResponse, TtlResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes internally, so handlers share it through a plain
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// TTL-aware cache over the configured engine
    pub cache: Arc<TtlCache<String>>,
    /// Policy of the wrapped engine, reported by `/stats`
    pub policy: EvictionPolicy,
}

impl AppState {
    pub fn new(cache: TtlCache<String>, policy: EvictionPolicy) -> Self {
        Self {
            cache: Arc::new(cache),
            policy,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the background sweep when `cleanup_interval` is non-zero, which
    /// requires a running Tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_config = config.cache_config()?;
        let cache = new_ttl_cache(&cache_config, config.ttl_config())?;
        Ok(Self::new(cache, cache_config.eviction_policy))
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error) => Err(CacheError::InvalidRequest(error)),
        None => Ok(()),
    }
}

fn millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req
        .ttl
        .map(Duration::from_secs)
        .unwrap_or_else(|| state.cache.default_ttl());
    let stored = state.cache.set_with_ttl(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    check_key(&key)?;
    let value = state
        .cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;
    state.cache.delete(&key);

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /ttl/:key
pub async fn get_ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    check_key(&key)?;
    let remaining = state
        .cache
        .get_ttl(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(TtlResponse::new(key, millis(remaining))))
}

/// Handler for POST /ttl/:key
///
/// Pushes back the expiration of a live key and returns the new remaining TTL.
pub async fn extend_ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ExtendTtlRequest>,
) -> Result<Json<TtlResponse>> {
    check_key(&key)?;
    let extra = Duration::from_secs(req.seconds).min(MAX_TTL);
    if !state.cache.extend_ttl(&key, extra) {
        return Err(CacheError::NotFound(key));
    }

    let remaining = state
        .cache
        .get_ttl(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    debug!(key = %key, extra_secs = req.seconds, "TTL extended");

    Ok(Json(TtlResponse::new(key, millis(remaining))))
}

/// Handler for POST /resize
pub async fn resize_handler(
    State(state): State<AppState>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<ResizeResponse>> {
    state.cache.resize(req.capacity)?;

    Ok(Json(ResizeResponse {
        capacity: state.cache.capacity(),
        total_entries: state.cache.size(),
    }))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    Json(ClearResponse::cleared())
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(
        &stats,
        state.cache.capacity(),
        state.policy,
    ))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
