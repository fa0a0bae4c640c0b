//! Response DTOs for the OCR cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, HashStrategy, OcrResult};

/// Response body for a cache hit (GET /ocr/:hash)
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub hash: String,
    pub text: String,
    pub confidence: Option<f64>,
}

impl LookupResponse {
    pub fn new(hash: impl Into<String>, result: OcrResult) -> Self {
        Self {
            hash: hash.into(),
            text: result.text,
            confidence: result.confidence,
        }
    }
}

/// Response body for PUT /ocr
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    /// The hash that was stored
    pub hash: String,
}

impl StoreResponse {
    pub fn new(hash: impl Into<String>) -> Self {
        let hash = hash.into();
        Self {
            message: format!("OCR result for '{}' cached", hash),
            hash,
        }
    }
}

/// Response body for DELETE /ocr
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries dropped
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: "OCR cache cleared".to_string(),
            removed,
        }
    }
}

/// Response body for POST /hash
#[derive(Debug, Clone, Serialize)]
pub struct HashResponse {
    pub hash: String,
    /// Strategy that produced the hash
    pub strategy: String,
}

impl HashResponse {
    pub fn new(hash: String, strategy: HashStrategy) -> Self {
        Self {
            hash,
            strategy: strategy.to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries
    pub size: usize,
    /// Oldest last-access timestamp, null when empty
    pub oldest_entry: Option<u64>,
    /// Newest last-access timestamp, null when empty
    pub newest_entry: Option<u64>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            size: stats.size,
            oldest_entry: stats.oldest_entry,
            newest_entry: stats.newest_entry,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
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

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
