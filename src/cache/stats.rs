//! Cache Statistics Module
//!
//! Occupancy snapshot plus running hit, miss and eviction counters.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the cache.
///
/// `oldest_entry` and `newest_entry` are the min and max `last_access`
/// across all entries, and are both `None` on an empty cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Smallest last-access timestamp (Unix milliseconds)
    pub oldest_entry: Option<u64>,
    /// Largest last-access timestamp (Unix milliseconds)
    pub newest_entry: Option<u64>,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups for absent or expired keys
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Entries dropped because their TTL ran out
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Occupancy ==
    /// Fills in size and access bounds from a set of last-access timestamps.
    pub fn with_occupancy<I>(mut self, stamps: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut size = 0;
        let mut oldest: Option<u64> = None;
        let mut newest: Option<u64> = None;

        for stamp in stamps {
            size += 1;
            oldest = Some(oldest.map_or(stamp, |o| o.min(stamp)));
            newest = Some(newest.map_or(stamp, |n| n.max(stamp)));
        }

        self.size = size;
        self.oldest_entry = oldest;
        self.newest_entry = newest;
        self
    }
}
