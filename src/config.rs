//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::cache::{HashStrategy, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MINUTES};
use crate::storage::{FileStorage, NoopStorage, StorageBackend};

/// Default request body limit: 32 MiB, room for a base64-encoded photo.
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached OCR results
    pub max_entries: usize,
    /// Minutes since last access before an entry goes stale
    pub ttl_minutes: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
    /// Snapshot file, None keeps the cache in memory only
    pub storage_path: Option<PathBuf>,
    /// Key derivation strategy
    pub hash_strategy: HashStrategy,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `TTL_MINUTES` - Entry time-to-live in minutes (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60, 0 = off)
    /// - `STORAGE_PATH` - Snapshot file path (default: unset, no persistence)
    /// - `HASH_STRATEGY` - `sha256`, `checksum` or `length` (default: detected)
    /// - `MAX_BODY_BYTES` - Request body limit in bytes (default: 32 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            ttl_minutes: parse_var("TTL_MINUTES").unwrap_or(defaults.ttl_minutes),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            storage_path: env::var("STORAGE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            hash_strategy: env::var("HASH_STRATEGY")
                .ok()
                .map(|v| {
                    v.parse().unwrap_or_else(|e| {
                        warn!("{}, falling back to detected strategy", e);
                        HashStrategy::detect()
                    })
                })
                .unwrap_or(defaults.hash_strategy),
            max_body_bytes: parse_var("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
        }
    }

    /// Builds the storage backend named by `storage_path`.
    pub fn storage_backend(&self) -> Box<dyn StorageBackend> {
        match &self.storage_path {
            Some(path) => Box::new(FileStorage::new(path)),
            None => Box::new(NoopStorage),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_minutes: DEFAULT_TTL_MINUTES,
            server_port: 3000,
            cleanup_interval: 60,
            storage_path: None,
            hash_strategy: HashStrategy::detect(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
