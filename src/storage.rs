//! Durable Storage Module
//!
//! Backends for the cache's durable mirror and the snapshot codec.
//!
//! A snapshot is a JSON array of `[hash, {"text", "confidence"?, "timestamp"}]`
//! pairs.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Storage Backend ==
/// A single durable slot holding the latest snapshot.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Replaces the slot's content.
    fn save(&self, bytes: &[u8]) -> Result<()>;

    /// Reads the slot. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<u8>>>;
}

// == Noop Storage ==
/// Backend for runtimes with no durable store. Saves are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStorage;

impl StorageBackend for NoopStorage {
    fn save(&self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

// == Memory Storage ==
/// In-process slot. Clones share the same slot, which lets a second cache
/// instance read what the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-filled with raw bytes.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        if let Ok(mut slot) = storage.slot.lock() {
            *slot = Some(bytes.into());
        }
        storage
    }

    /// Returns a copy of the current slot content.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Makes subsequent saves fail, simulating a full quota.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl StorageBackend for MemoryStorage {
    fn save(&self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Storage(std::io::Error::new(
                ErrorKind::Other,
                "storage quota exceeded",
            )));
        }
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CacheError::Internal("storage slot lock poisoned".to_string()))?;
        *slot = Some(bytes.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CacheError::Internal("storage slot lock poisoned".to_string()))?;
        Ok(slot.clone())
    }
}

// == File Storage ==
/// Snapshot kept in a JSON file on local disk.
///
/// Writes go to `<path>.tmp`, are flushed to disk with `sync_all` and then
/// renamed into place, so a crash mid-write leaves the previous snapshot
/// intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl StorageBackend for FileStorage {
    fn save(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// == Snapshot Codec ==
/// Encodes all entries as the durable JSON array.
pub fn encode_snapshot(entries: &HashMap<String, CacheEntry>) -> Result<Vec<u8>> {
    let pairs: Vec<(&String, &CacheEntry)> = entries.iter().collect();
    Ok(serde_json::to_vec(&pairs)?)
}

/// Decodes a durable JSON array back into entries.
pub fn decode_snapshot(bytes: &[u8]) -> Result<HashMap<String, CacheEntry>> {
    let pairs: Vec<(String, CacheEntry)> = serde_json::from_slice(bytes)?;
    Ok(pairs.into_iter().collect())
}
