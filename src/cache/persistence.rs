//! Persistence Module
//!
//! JSON snapshot of the whole cache: format version, byte budget and every
//! entry in recency order (most recently used first).

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheStore};
use crate::error::{CacheError, Result};

/// Format tag written to and required from every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// File name used when a snapshot directory is configured.
pub const SNAPSHOT_FILE_NAME: &str = "studyhive_cache.json";

// == Snapshot Entry ==
/// One persisted entry. Timestamps are whole Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub value: String,
    pub source: String,
    pub created_at: u64,
    pub last_accessed: u64,
    pub size_bytes: usize,
}

impl From<&CacheEntry> for SnapshotEntry {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            source: entry.source.clone(),
            created_at: entry.created_at / 1000,
            last_accessed: entry.last_accessed / 1000,
            size_bytes: entry.size_bytes,
        }
    }
}

impl From<SnapshotEntry> for CacheEntry {
    fn from(entry: SnapshotEntry) -> Self {
        Self {
            key: entry.key,
            value: entry.value,
            source: entry.source,
            created_at: entry.created_at.saturating_mul(1000),
            last_accessed: entry.last_accessed.saturating_mul(1000),
            size_bytes: entry.size_bytes,
        }
    }
}

// == Snapshot Document ==
/// The persisted document. Entry order is recency order at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub version: String,
    pub max_size_bytes: usize,
    pub entries: Vec<SnapshotEntry>,
}

impl SnapshotDocument {
    // == Capture ==
    /// Copies the store's budget and entries. Does not touch the store.
    pub fn capture(store: &CacheStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            max_size_bytes: store.max_size_bytes(),
            entries: store.entries().map(SnapshotEntry::from).collect(),
        }
    }

    // == Validate ==
    /// Checks the version tag, per-entry sizes and key uniqueness.
    ///
    /// Empty keys and values are legal.
    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CacheError::UnsupportedVersion(self.version.clone()));
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for (pos, entry) in self.entries.iter().enumerate() {
            if entry.size_bytes != entry.value.len() {
                return Err(CacheError::InvalidSnapshot(format!(
                    "entry {} ({:?}) declares {} bytes but holds {}",
                    pos,
                    entry.key,
                    entry.size_bytes,
                    entry.value.len()
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(CacheError::InvalidSnapshot(format!(
                    "duplicate key {:?} at entry {}",
                    entry.key, pos
                )));
            }
        }

        Ok(())
    }

    // == Into Store ==
    /// Validates, then builds a store keeping `counters` from the caller.
    pub fn into_store(self, counters: CacheCounters) -> Result<CacheStore> {
        self.validate()?;
        let entries = self.entries.into_iter().map(CacheEntry::from).collect();
        Ok(CacheStore::restore(self.max_size_bytes, entries, counters))
    }

    // == File I/O ==
    /// Writes the document as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads and parses a document. Does not validate it.
    pub fn read_from(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let doc = serde_json::from_reader(BufReader::new(file))?;
        Ok(doc)
    }
}

// == Snapshot Path ==
/// Location of the snapshot file inside `base_dir`, or the bare file name.
pub fn snapshot_path(base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(SNAPSHOT_FILE_NAME),
        _ => PathBuf::from(SNAPSHOT_FILE_NAME),
    }
}

// == Set Aside Snapshot ==
/// Renames an unreadable snapshot to `<file>.corrupt` so a later save does
/// not overwrite it. An older `.corrupt` file is replaced. Returns the new
/// location.
pub fn set_aside_snapshot(path: &Path) -> Result<PathBuf> {
    let mut name = path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
        CacheError::InvalidRequest(format!("not a file path: {}", path.display()))
    })?;
    name.push(".corrupt");

    let target = path.with_file_name(name);
    fs::rename(path, &target)?;
    Ok(target)
}

// == Prune Snapshot Files ==
/// Deletes `.json` files in `dir` last modified more than `max_age` ago.
///
/// A missing directory removes nothing. Returns the number of files deleted.
pub fn prune_snapshot_files(dir: &Path, max_age: Duration) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let mut removed = 0;

    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "pruned stale snapshot");
            removed += 1;
        }
    }

    Ok(removed)
}
