//! Eviction Policy Module
//!
//! Capacity and TTL rules for the OCR cache.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Eviction Policy ==
/// Enforces the entry limit and the time-to-live.
///
/// Victims are chosen by smallest `last_access`, so a read refreshes an
/// entry's priority exactly like a write does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Time-to-live in milliseconds
    ttl_ms: u64,
}

impl EvictionPolicy {
    // == Constructor ==
    /// Creates a policy from a capacity and a TTL in minutes.
    pub fn new(max_entries: usize, ttl_minutes: u64) -> Self {
        Self {
            max_entries,
            ttl_ms: ttl_minutes.saturating_mul(60_000),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    // == Is Expired ==
    /// An entry is stale once its age strictly exceeds the TTL.
    pub fn is_expired(&self, entry: &CacheEntry, now_ms: u64) -> bool {
        entry.age_ms(now_ms) > self.ttl_ms
    }

    // == Needs Eviction ==
    /// Whether inserting a key not yet present requires a victim first.
    pub fn needs_eviction(&self, len: usize) -> bool {
        len >= self.max_entries
    }

    // == Select Victim ==
    /// Returns the key with the smallest `last_access`, or `None` when empty.
    ///
    /// Ties go to whichever key the map yields first.
    pub fn select_victim(&self, entries: &HashMap<String, CacheEntry>) -> Option<String> {
        entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone())
    }

    // == Expired Keys ==
    /// Collects every key whose entry is stale at `now_ms`.
    pub fn expired_keys(&self, entries: &HashMap<String, CacheEntry>, now_ms: u64) -> Vec<String> {
        entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now_ms))
            .map(|(key, _)| key.clone())
            .collect()
    }
}
