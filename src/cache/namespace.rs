//! Namespace Operations
//!
//! Scans and clears scoped to the source tag carried by every entry.

use crate::cache::CacheStore;

impl CacheStore {
    // == Keys By Source ==
    /// Keys tagged with `source`, most recently used first.
    pub fn keys_by_source(&self, source: &str) -> Vec<String> {
        self.entries()
            .filter(|entry| entry.source == source)
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Size By Source ==
    /// Total bytes held under `source`.
    pub fn size_by_source(&self, source: &str) -> usize {
        self.entries()
            .filter(|entry| entry.source == source)
            .map(|entry| entry.size_bytes)
            .sum()
    }

    // == Clear By Source ==
    /// Drops every entry tagged with `source`. Returns how many were removed.
    pub fn clear_by_source(&mut self, source: &str) -> usize {
        self.remove_where(|entry| entry.source == source)
    }
}
