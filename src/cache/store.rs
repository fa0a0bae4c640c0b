//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with last-access eviction,
//! TTL expiration and a durable mirror.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, EvictionPolicy, HashStrategy, OcrResult};
use crate::clock::{Clock, SystemClock};
use crate::storage::{decode_snapshot, encode_snapshot, NoopStorage, StorageBackend};

// == Public Constants ==
/// Default maximum number of cached results
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default time-to-live in minutes
pub const DEFAULT_TTL_MINUTES: u64 = 60;

// == OCR Cache ==
/// Bounded OCR result cache keyed by image hash.
///
/// Every mutation (a hit, a set, a clear, a lazy TTL purge) is mirrored to
/// the storage backend. Storage failures are logged and never surface to
/// the caller; the in-memory map stays authoritative.
#[derive(Debug)]
pub struct OcrCache {
    /// Hash to result storage
    entries: HashMap<String, CacheEntry>,
    /// Capacity and TTL rules
    policy: EvictionPolicy,
    /// Running counters
    stats: CacheStats,
    /// Durable mirror
    storage: Box<dyn StorageBackend>,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl OcrCache {
    // == Constructor ==
    /// Creates a cache with no durable storage, driven by the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `ttl_minutes` - Minutes since last access before an entry goes stale
    pub fn new(max_entries: usize, ttl_minutes: u64) -> Self {
        Self::open(
            max_entries,
            ttl_minutes,
            Box::new(NoopStorage),
            Arc::new(SystemClock),
        )
    }

    /// Creates a cache backed by `storage` and loads its snapshot.
    pub fn with_storage(
        max_entries: usize,
        ttl_minutes: u64,
        storage: Box<dyn StorageBackend>,
    ) -> Self {
        Self::open(max_entries, ttl_minutes, storage, Arc::new(SystemClock))
    }

    /// Creates a cache from all of its parts and loads the stored snapshot.
    pub fn open(
        max_entries: usize,
        ttl_minutes: u64,
        storage: Box<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut cache = Self {
            entries: HashMap::new(),
            policy: EvictionPolicy::new(max_entries, ttl_minutes),
            stats: CacheStats::new(),
            storage,
            clock,
        };
        cache.load_from_storage();
        cache
    }

    // == Get ==
    /// Looks up the result cached for `key`.
    ///
    /// A stale entry is removed and reported as a miss. A fresh entry has its
    /// last access moved to now.
    pub fn get(&mut self, key: &str) -> Option<OcrResult> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                debug!(key, "OCR cache miss");
                return None;
            }
            Some(entry) => self.policy.is_expired(entry, now),
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            debug!(key, "OCR cache entry expired");
            self.save_to_storage();
            return None;
        }

        let result = self.entries.get_mut(key).map(|entry| {
            entry.touch(now);
            entry.to_result()
        });
        self.stats.record_hit();
        debug!(key, "OCR cache hit");
        self.save_to_storage();
        result
    }

    // == Set ==
    /// Stores a recognition result under `key`.
    ///
    /// Overwriting keeps the size unchanged. Inserting a new key at capacity
    /// first evicts the least recently accessed entry.
    pub fn set(&mut self, key: impl Into<String>, text: impl Into<String>, confidence: Option<f64>) {
        let key = key.into();
        let now = self.clock.now_ms();

        if !self.entries.contains_key(&key) && self.policy.needs_eviction(self.entries.len()) {
            if let Some(victim) = self.policy.select_victim(&self.entries) {
                self.entries.remove(&victim);
                self.stats.record_eviction();
                debug!(key = %victim, "Evicted least recently accessed OCR result");
            }
        }

        // A zero-capacity cache keeps nothing.
        if self.policy.max_entries() > 0 {
            self.entries
                .insert(key, CacheEntry::new(text.into(), confidence, now));
        }

        self.save_to_storage();
    }

    // == Clear ==
    /// Removes every entry and persists the empty state.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        info!(removed, "OCR cache cleared");
        self.save_to_storage();
    }

    // == Stats ==
    /// Returns occupancy and counters.
    pub fn get_stats(&self) -> CacheStats {
        self.stats
            .clone()
            .with_occupancy(self.entries.values().map(|entry| entry.last_access))
    }

    // == Purge Expired ==
    /// Removes all stale entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired = self.policy.expired_keys(&self.entries, now);
        let count = expired.len();

        for key in expired {
            self.entries.remove(&key);
        }

        if count > 0 {
            self.stats.record_expirations(count);
            self.save_to_storage();
        }
        count
    }

    // == Contains ==
    /// Reports whether `key` is stored, without refreshing or purging it.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Max Entries ==
    /// Returns the configured capacity.
    pub fn max_entries(&self) -> usize {
        self.policy.max_entries()
    }

    // == TTL ==
    /// Returns how long an entry stays fresh after its last access.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.policy.ttl_ms())
    }

    // == Generate Image Hash ==
    /// Derives a cache key for `content` with the strongest available strategy.
    pub fn generate_image_hash(content: &str) -> String {
        HashStrategy::detect().generate_image_hash(content)
    }

    // == Save To Storage ==
    /// Writes the full snapshot to the storage backend.
    ///
    /// Failures are logged and swallowed.
    pub fn save_to_storage(&self) {
        let result = encode_snapshot(&self.entries).and_then(|bytes| self.storage.save(&bytes));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist OCR cache");
        }
    }

    // == Load From Storage ==
    /// Replaces the in-memory map with the stored snapshot.
    ///
    /// Entries already stale are dropped, then the oldest surplus entries if
    /// the snapshot exceeds capacity. Unreadable or malformed data leaves the
    /// cache empty and overwrites the slot with the empty state.
    pub fn load_from_storage(&mut self) {
        let loaded = match self.storage.load().and_then(|bytes| match bytes {
            Some(bytes) => decode_snapshot(&bytes).map(Some),
            None => Ok(None),
        }) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!("No stored OCR cache snapshot");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load OCR cache snapshot, starting empty");
                self.clear();
                return;
            }
        };

        self.entries = loaded;
        let loaded_count = self.entries.len();

        let now = self.clock.now_ms();
        let expired = self.policy.expired_keys(&self.entries, now);
        for key in &expired {
            self.entries.remove(key);
        }
        self.stats.record_expirations(expired.len());

        let mut trimmed = 0;
        while self.entries.len() > self.policy.max_entries() {
            match self.policy.select_victim(&self.entries) {
                Some(victim) => {
                    self.entries.remove(&victim);
                    self.stats.record_eviction();
                    trimmed += 1;
                }
                None => break,
            }
        }

        info!(
            loaded = loaded_count,
            expired = expired.len(),
            trimmed,
            "OCR cache snapshot loaded"
        );

        if !expired.is_empty() || trimmed > 0 {
            self.save_to_storage();
        }
    }
}

impl Default for OcrCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MINUTES)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::storage::MemoryStorage;

    const MINUTE: u64 = 60_000;

    fn cache_at(max_entries: usize, ttl_minutes: u64, clock: &MockClock) -> OcrCache {
        OcrCache::open(
            max_entries,
            ttl_minutes,
            Box::new(NoopStorage),
            Arc::new(clock.clone()),
        )
    }

    #[test]
    fn test_defaults() {
        let cache = OcrCache::default();
        assert_eq!(cache.max_entries(), 100);
        assert_eq!(cache.ttl(), Duration::from_secs(3600));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(10, 60, &clock);

        cache.set("h1", "invoice 42", Some(0.93));
        let result = cache.get("h1").unwrap();

        assert_eq!(result.text, "invoice 42");
        assert_eq!(result.confidence, Some(0.93));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_absent() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(10, 60, &clock);

        assert!(cache.get("missing").is_none());
        assert_eq!(cache.get_stats().misses, 1);
    }

    #[test]
    fn test_ttl_just_before_expiry_is_hit() {
        let clock = MockClock::new(1_000);
        let mut cache = cache_at(10, 1, &clock);

        cache.set("h1", "text", None);
        clock.advance(MINUTE - 1);

        assert!(cache.get("h1").is_some());
    }

    #[test]
    fn test_ttl_exactly_at_expiry_is_hit() {
        let clock = MockClock::new(1_000);
        let mut cache = cache_at(10, 1, &clock);

        cache.set("h1", "text", None);
        clock.advance(MINUTE);

        assert!(cache.get("h1").is_some());
    }

    #[test]
    fn test_ttl_just_after_expiry_is_purged() {
        let clock = MockClock::new(1_000);
        let mut cache = cache_at(10, 1, &clock);

        cache.set("h1", "text", None);
        clock.advance(MINUTE + 1);

        assert!(cache.get("h1").is_none());
        assert!(!cache.contains("h1"));
        assert_eq!(cache.len(), 0);

        let stats = cache.get_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_hit_refreshes_last_access() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(10, 1, &clock);

        cache.set("h1", "text", None);
        clock.advance(40_000);
        assert!(cache.get("h1").is_some());
        assert_eq!(cache.get_stats().newest_entry, Some(40_000));

        // 80s after the write, 40s after the refresh
        clock.advance(40_000);
        assert!(cache.get("h1").is_some());
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(10, 60, &clock);

        cache.set("h1", "first", Some(0.1));
        clock.advance(5);
        cache.set("h1", "second", None);

        assert_eq!(cache.len(), 1);
        let result = cache.get("h1").unwrap();
        assert_eq!(result.text, "second");
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(2, 60, &clock);

        cache.set("a", "1", None);
        clock.advance(1);
        cache.set("b", "2", None);
        clock.advance(1);
        cache.set("a", "3", None);

        assert!(cache.contains("a"));
        assert!(cache.contains("b"));
        assert_eq!(cache.get_stats().evictions, 0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(3, 60, &clock);

        for key in ["k1", "k2", "k3", "k4"] {
            cache.set(key, format!("text_{}", key), None);
            clock.advance(1);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("k1"));
        assert!(cache.contains("k2"));
        assert!(cache.contains("k3"));
        assert!(cache.contains("k4"));
        assert_eq!(cache.get_stats().evictions, 1);
    }

    #[test]
    fn test_refreshed_entry_survives_eviction() {
        // A at t=0, B at t=1, get(A) at t=2, C at t=3 -> B evicted
        let clock = MockClock::new(0);
        let mut cache = cache_at(2, 60, &clock);

        cache.set("A", "a", None);
        clock.set(1);
        cache.set("B", "b", None);
        clock.set(2);
        assert!(cache.get("A").is_some());
        clock.set(3);
        cache.set("C", "c", None);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("A"));
        assert!(!cache.contains("B"));
        assert!(cache.contains("C"));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(0, 60, &clock);

        cache.set("h1", "text", None);
        assert!(cache.is_empty());
        assert!(cache.get("h1").is_none());
    }

    #[test]
    fn test_clear() {
        let clock = MockClock::new(0);
        let storage = MemoryStorage::new();
        let mut cache = OcrCache::open(10, 60, Box::new(storage.clone()), Arc::new(clock));

        cache.set("h1", "a", None);
        cache.set("h2", "b", None);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(storage.contents(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_stats_empty_and_populated() {
        let clock = MockClock::new(100);
        let mut cache = cache_at(10, 60, &clock);

        let empty = cache.get_stats();
        assert_eq!(empty.size, 0);
        assert_eq!(empty.oldest_entry, None);
        assert_eq!(empty.newest_entry, None);

        cache.set("a", "1", None);
        clock.set(250);
        cache.set("b", "2", None);

        let stats = cache.get_stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.oldest_entry, Some(100));
        assert_eq!(stats.newest_entry, Some(250));
    }

    #[test]
    fn test_purge_expired() {
        let clock = MockClock::new(0);
        let mut cache = cache_at(10, 1, &clock);

        cache.set("old", "1", None);
        clock.advance(30_000);
        cache.set("fresh", "2", None);
        clock.advance(31_000);

        assert_eq!(cache.purge_expired(), 1);
        assert!(!cache.contains("old"));
        assert!(cache.contains("fresh"));
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let clock = MockClock::new(0);
        let storage = MemoryStorage::new();
        let mut cache = OcrCache::open(10, 1, Box::new(storage.clone()), Arc::new(clock.clone()));

        cache.set("h1", "text", None);
        let after_set = storage.contents().unwrap();
        assert!(String::from_utf8_lossy(&after_set).contains("\"timestamp\":0"));

        clock.set(10);
        cache.get("h1");
        let after_hit = storage.contents().unwrap();
        assert!(String::from_utf8_lossy(&after_hit).contains("\"timestamp\":10"));

        clock.advance(MINUTE + 1);
        cache.get("h1");
        assert_eq!(storage.contents(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_persistence_failure_does_not_affect_memory() {
        let clock = MockClock::new(0);
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let mut cache = OcrCache::open(10, 60, Box::new(storage.clone()), Arc::new(clock));

        cache.set("h1", "text", Some(0.5));

        assert_eq!(cache.get("h1").unwrap().text, "text");
        assert!(storage.contents().is_none());
    }

    #[test]
    fn test_generate_image_hash_uses_digest() {
        let a = OcrCache::generate_image_hash("hello");
        assert_eq!(a, OcrCache::generate_image_hash("hello"));
        assert_ne!(a, OcrCache::generate_image_hash("world"));
        assert_eq!(a.len(), 64);
    }
}
