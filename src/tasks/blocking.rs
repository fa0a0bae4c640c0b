//! Blocking Cache Access
//!
//! Every mutation of `OcrCache` rewrites the durable snapshot with `std::fs`.
//! Async callers run those mutations on tokio's blocking pool so disk I/O
//! never stalls a runtime worker.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::OcrCache;
use crate::error::{CacheError, Result};

/// Runs `f` against the exclusively locked cache on the blocking pool.
///
/// The write lock is taken and released inside the blocking task, so the
/// snapshot write happens off the async worker that awaits the result.
pub async fn with_cache_blocking<F, T>(cache: &Arc<RwLock<OcrCache>>, f: F) -> Result<T>
where
    F: FnOnce(&mut OcrCache) -> T + Send + 'static,
    T: Send + 'static,
{
    let cache = Arc::clone(cache);
    tokio::task::spawn_blocking(move || {
        let mut guard = cache.blocking_write();
        f(&mut guard)
    })
    .await
    .map_err(|e| CacheError::Internal(format!("cache task failed: {}", e)))
}
