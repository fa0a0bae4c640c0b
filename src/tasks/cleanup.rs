//! TTL Sweep Task
//!
//! Background task that periodically purges stale OCR results.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::with_cache_blocking;
use crate::cache::OcrCache;

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// Lookups already purge stale entries lazily; the sweep keeps memory and
/// the durable snapshot from holding results nobody asks for again.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(OcrCache::new(100, 60)));
/// let handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<OcrCache>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match with_cache_blocking(&cache, |cache| cache.purge_expired()).await {
                Ok(0) => debug!("TTL sweep: no expired OCR results found"),
                Ok(removed) => info!("TTL sweep: removed {} expired OCR results", removed),
                Err(e) => warn!(error = %e, "TTL sweep failed"),
            }
        }
    })
}
