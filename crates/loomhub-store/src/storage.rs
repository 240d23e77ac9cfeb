//! # Snapshot Storage
//!
//! The client-local key-value persistence boundary for cart snapshots.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Store Layout                                │
//! │                                                                         │
//! │   key          entry                                                    │
//! │   ─────────    ───────────────────────────────────────────────         │
//! │   main_cart    { value: "<cart JSON>", expiresAt: "…+7d" }             │
//! │   sample_cart  { value: "<cart JSON>", expiresAt: "…+7d" }             │
//! │                                                                         │
//! │   • Every put() replaces the whole entry (full-snapshot writes only)   │
//! │   • get() of an expired entry reports None, same as missing            │
//! │   • Values are opaque strings; the store never parses cart JSON        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations ship with the crate: [`MemoryStore`] for tests and
//! ephemeral sessions, [`FileStore`] for the on-disk client cache. Both are
//! synchronous; a put is complete when the call returns.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Storage Error
// =============================================================================

/// Snapshot store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading the backing store failed.
    ///
    /// ## When This Occurs
    /// - Store file exists but cannot be opened (permissions)
    /// - Backing medium went away mid-session
    #[error("Storage read failed: {0}")]
    ReadFailed(String),

    /// Writing the backing store failed.
    ///
    /// ## When This Occurs
    /// - Disk full, permissions, directory removed
    /// - The CartStore logs and swallows this on write-through
    #[error("Storage write failed: {0}")]
    WriteFailed(String),

    /// Entry serialization failed.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Snapshot Store Trait
// =============================================================================

/// A client-local key-value store for full cart snapshots.
///
/// Implementations must be safe to share across threads; the CartStore holds
/// one behind an `Arc` and calls it from whichever thread runs the command.
pub trait SnapshotStore: Send + Sync {
    /// Reads the value under `key`. Expired entries report `None`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the value under `key`, expiring `ttl` from now.
    fn put(&self, key: &str, value: &str, ttl: Duration) -> StorageResult<()>;

    /// Drops the value under `key`. Missing keys are fine.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// One stored entry: the opaque value plus its expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredEntry {
    fn new(value: &str, ttl: Duration) -> Self {
        StoredEntry {
            value: value.to_string(),
            expires_at: Utc::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory snapshot store.
///
/// Backs guest sessions without disk access and keeps tests hermetic.
/// Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut entries = self.entries.lock().expect("memory store mutex poisoned");

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> StorageResult<()> {
        let mut entries = self.entries.lock().expect("memory store mutex poisoned");
        entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().expect("memory store mutex poisoned");
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// File-backed snapshot store.
///
/// The whole store is one JSON document mapping keys to entries, rewritten
/// atomically (write temp file, rename) on every put. Cart snapshots are
/// small and writes are rare enough that rewriting the document beats
/// managing per-key files.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles between threads of this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the given file. The file is created on the
    /// first put; a missing file reads as an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the entry map from disk.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as
    /// empty: the next put rewrites it wholesale, which matches the cart
    /// contract that a snapshot is either fully present or absent.
    fn load(&self) -> StorageResult<HashMap<String, StoredEntry>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    /// Writes the entry map to disk via a temp file + rename.
    fn save(&self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()> {
        let raw = serde_json::to_string(entries)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, raw).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.load()?;

        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> StorageResult<()> {
        let _guard = self.write_lock.lock().expect("file store mutex poisoned");

        let mut entries = self.load()?;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().expect("file store mutex poisoned");

        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        store.put("main_cart", r#"{"items":[]}"#, Duration::days(7)).unwrap();
        assert_eq!(
            store.get("main_cart").unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );

        store.remove("main_cart").unwrap();
        assert_eq!(store.get("main_cart").unwrap(), None);
    }

    #[test]
    fn test_memory_store_expiry() {
        let store = MemoryStore::new();

        store.put("main_cart", "stale", Duration::seconds(-1)).unwrap();
        assert_eq!(store.get("main_cart").unwrap(), None);
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("sample_cart").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("carts.json"));

        store.put("main_cart", "snapshot-a", Duration::days(7)).unwrap();
        store.put("sample_cart", "snapshot-b", Duration::days(7)).unwrap();

        assert_eq!(store.get("main_cart").unwrap().as_deref(), Some("snapshot-a"));
        assert_eq!(store.get("sample_cart").unwrap().as_deref(), Some("snapshot-b"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carts.json");

        FileStore::new(&path)
            .put("main_cart", "persisted", Duration::days(7))
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("main_cart").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_file_store_expired_entries_are_gone() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("carts.json"));

        store.put("main_cart", "stale", Duration::seconds(-1)).unwrap();
        assert_eq!(store.get("main_cart").unwrap(), None);

        // The next put also compacts expired entries out of the document
        store.put("sample_cart", "fresh", Duration::days(7)).unwrap();
        let entries = store.load().unwrap();
        assert!(!entries.contains_key("main_cart"));
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carts.json");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("main_cart").unwrap(), None);

        // And a put rewrites it into a valid document
        store.put("main_cart", "recovered", Duration::days(7)).unwrap();
        assert_eq!(store.get("main_cart").unwrap().as_deref(), Some("recovered"));
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-written.json"));
        assert_eq!(store.get("main_cart").unwrap(), None);
    }
}
