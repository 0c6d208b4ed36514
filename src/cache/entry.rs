//! Cache Entry Module
//!
//! Defines the record stored for every cached artifact.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached artifact with its namespace tag and access metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Unique key (usually a fingerprint from [`crate::keys`])
    pub key: String,
    /// Opaque payload
    pub value: String,
    /// Namespace tag of the producer, e.g. "device-llm" or "rules"
    pub source: String,
    /// First insertion time (Unix milliseconds)
    pub created_at: u64,
    /// Last read or write (Unix milliseconds)
    pub last_accessed: u64,
    /// Byte length of `value`
    pub size_bytes: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry stamped with the current time.
    pub fn new(key: String, value: String, source: String) -> Self {
        let now = current_timestamp_ms();
        let size_bytes = value.len();

        Self {
            key,
            value,
            source,
            created_at: now,
            last_accessed: now,
            size_bytes,
        }
    }

    // == Replace ==
    /// Overwrites value and source in place, keeping `size_bytes` in sync.
    ///
    /// `created_at` keeps the time of the first insertion.
    pub fn replace(&mut self, value: String, source: String) {
        self.size_bytes = value.len();
        self.value = value;
        self.source = source;
        self.touch();
    }

    // == Touch ==
    /// Marks the entry as accessed now.
    pub fn touch(&mut self) {
        self.last_accessed = current_timestamp_ms();
    }

    // == Idle Time ==
    /// Milliseconds elapsed since the last access, relative to `now_ms`.
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_accessed)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
