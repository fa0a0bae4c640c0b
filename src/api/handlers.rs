//! API Handlers
//!
//! HTTP request handlers for each OCR cache endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{HashStrategy, OcrCache};
use crate::config::{Config, DEFAULT_MAX_BODY_BYTES};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, HashRequest, HashResponse, HealthResponse, LookupResponse, StatsResponse,
    StoreRequest, StoreResponse,
};
use crate::tasks::with_cache_blocking;

/// Application state shared across all handlers.
///
/// Holds the single cache instance behind `Arc<RwLock<>>`, the key
/// strategy chosen at startup and the request body limit.
#[derive(Clone)]
pub struct AppState {
    /// Shared OCR cache
    pub cache: Arc<RwLock<OcrCache>>,
    /// Strategy used by POST /hash
    pub hash_strategy: HashStrategy,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    /// Creates a new AppState around `cache`, hashing with the detected strategy.
    pub fn new(cache: OcrCache) -> Self {
        Self::with_strategy(cache, HashStrategy::detect())
    }

    pub fn with_strategy(cache: OcrCache, hash_strategy: HashStrategy) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            hash_strategy,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Replaces the request body limit.
    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the configured storage backend and loads its snapshot.
    pub fn from_config(config: &Config) -> Self {
        let cache = OcrCache::with_storage(
            config.max_entries,
            config.ttl_minutes,
            config.storage_backend(),
        );
        Self::with_strategy(cache, config.hash_strategy).with_body_limit(config.max_body_bytes)
    }
}

/// Handler for POST /hash
///
/// Derives the cache key for a piece of image content.
pub async fn hash_handler(
    State(state): State<AppState>,
    Json(req): Json<HashRequest>,
) -> Json<HashResponse> {
    let hash = state.hash_strategy.generate_image_hash(&req.content);
    Json(HashResponse::new(hash, state.hash_strategy))
}

/// Handler for PUT /ocr
///
/// Stores a recognition result under its image hash.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let StoreRequest {
        hash,
        text,
        confidence,
    } = req;
    let key = hash.clone();
    with_cache_blocking(&state.cache, move |cache| cache.set(key, text, confidence)).await?;

    Ok(Json(StoreResponse::new(hash)))
}

/// Handler for GET /ocr/:hash
///
/// Looks up a cached recognition result.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<LookupResponse>> {
    // Write lock: a hit refreshes the entry and an expired entry is purged
    let key = hash.clone();
    let result = with_cache_blocking(&state.cache, move |cache| cache.get(&key))
        .await?
        .ok_or_else(|| CacheError::NotFound(hash.clone()))?;

    Ok(Json(LookupResponse::new(hash, result)))
}

/// Handler for DELETE /ocr
///
/// Empties the cache.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let removed = with_cache_blocking(&state.cache, |cache| {
        let removed = cache.len();
        cache.clear();
        removed
    })
    .await?;

    Ok(Json(ClearResponse::new(removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(cache.get_stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
