//! Shared Cache Module
//!
//! `KvStore` is the thread-safe handle collaborators hold. One mutex guards
//! the whole `CacheStore`; every operation takes it for its full duration,
//! except snapshot file I/O, which runs outside the lock.

use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::cache::persistence::SnapshotDocument;
use crate::cache::{CacheCounters, CacheStore, CachedValue, StatsReport, DEFAULT_MAX_SIZE_BYTES};
use crate::error::Result;

// == Usage ==
/// Entry count and byte figures read under one lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub entries: usize,
    pub size_bytes: usize,
    pub max_size_bytes: usize,
}

impl Usage {
    fn of(store: &CacheStore) -> Self {
        Self {
            entries: store.len(),
            size_bytes: store.size_bytes(),
            max_size_bytes: store.max_size_bytes(),
        }
    }
}

// == KvStore ==
/// Mutex-guarded LRU cache with namespace, maintenance and snapshot
/// operations.
#[derive(Debug)]
pub struct KvStore {
    inner: Mutex<CacheStore>,
}

impl Default for KvStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE_BYTES)
    }
}

impl KvStore {
    // == Constructor ==
    /// Creates an empty cache with a byte budget of `max_size_bytes`.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(CacheStore::new(max_size_bytes)),
        }
    }

    // == Core Operations ==
    /// Stores or replaces `key`. Returns the number of entries evicted.
    pub fn put(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<String>,
    ) -> usize {
        self.inner.lock().put(key.into(), value.into(), source.into())
    }

    /// Looks up `key`, promoting it and counting a hit or miss.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        self.inner.lock().get(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.inner.lock().remove(key)
    }

    /// Presence check; no effect on recency or statistics.
    pub fn exists(&self, key: &str) -> bool {
        self.inner.lock().exists(key)
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn size_bytes(&self) -> usize {
        self.inner.lock().size_bytes()
    }

    pub fn max_size_bytes(&self) -> usize {
        self.inner.lock().max_size_bytes()
    }

    /// Changes the budget, evicting immediately. Returns the eviction count.
    pub fn set_max_size_bytes(&self, max_size_bytes: usize) -> usize {
        self.inner.lock().set_max_size_bytes(max_size_bytes)
    }

    /// Like [`set_max_size_bytes`](Self::set_max_size_bytes), also returning
    /// the usage right after the evictions.
    pub fn resize(&self, max_size_bytes: usize) -> (usize, Usage) {
        let mut store = self.inner.lock();
        let evicted = store.set_max_size_bytes(max_size_bytes);
        (evicted, Usage::of(&store))
    }

    pub fn usage(&self) -> Usage {
        Usage::of(&self.inner.lock())
    }

    /// Drops every entry. Returns how many were held.
    pub fn clear(&self) -> usize {
        let mut store = self.inner.lock();
        let removed = store.len();
        store.clear();
        removed
    }

    // == Namespace Operations ==
    pub fn keys_by_source(&self, source: &str) -> Vec<String> {
        self.inner.lock().keys_by_source(source)
    }

    pub fn size_by_source(&self, source: &str) -> usize {
        self.inner.lock().size_by_source(source)
    }

    /// Keys (MRU first) and total bytes for `source`, read together.
    pub fn source_summary(&self, source: &str) -> (Vec<String>, usize) {
        let store = self.inner.lock();
        (store.keys_by_source(source), store.size_by_source(source))
    }

    pub fn clear_by_source(&self, source: &str) -> usize {
        self.inner.lock().clear_by_source(source)
    }

    // == Maintenance ==
    pub fn cleanup_expired_entries(&self, max_age: Duration) -> usize {
        self.inner.lock().cleanup_expired_entries(max_age)
    }

    pub fn cleanup_old_entries(&self, max_entries: usize) -> usize {
        self.inner.lock().cleanup_old_entries(max_entries)
    }

    // == Statistics ==
    pub fn stats(&self) -> StatsReport {
        self.inner.lock().stats()
    }

    pub fn reset_stats(&self) {
        self.inner.lock().reset_stats();
    }

    // == Persistence ==
    /// Writes a snapshot of the cache to `path`.
    ///
    /// Entries are copied under the lock and written after it is released,
    /// so the file reflects the cache at the moment of the copy; writes that
    /// land during the file I/O are not included. The cache is never modified.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let doc = {
            let store = self.inner.lock();
            SnapshotDocument::capture(&store)
        };

        doc.write_to(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to save cache snapshot");
            e
        })?;

        info!(path = %path.display(), entries = doc.entries.len(), "cache snapshot saved");
        Ok(())
    }

    /// Replaces the cache contents with the snapshot at `path`.
    ///
    /// The document is read and fully validated before the lock is taken; on
    /// any failure the cache is left exactly as it was. Statistics counters
    /// carry over unchanged.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut restored =
            SnapshotDocument::read_from(path)?.into_store(CacheCounters::default())?;
        let entries = restored.len();

        let mut store = self.inner.lock();
        restored.absorb_counters(store.counters());
        *store = restored;
        drop(store);

        info!(path = %path.display(), entries, "cache snapshot loaded");
        Ok(())
    }
}
