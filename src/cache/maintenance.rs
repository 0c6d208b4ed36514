//! Maintenance Policies
//!
//! Age- and count-based sweeps, independent of the byte budget.

use std::time::Duration;

use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::CacheStore;

/// Default idle age after which an entry is considered stale.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

impl CacheStore {
    // == Cleanup Expired ==
    /// Removes every entry idle for longer than `max_age`.
    ///
    /// Returns the number removed. Expiry is not counted as eviction.
    pub fn cleanup_expired_entries(&mut self, max_age: Duration) -> usize {
        self.cleanup_expired_at(current_timestamp_ms(), max_age)
    }

    /// Same as [`cleanup_expired_entries`](Self::cleanup_expired_entries)
    /// against an explicit clock reading.
    pub fn cleanup_expired_at(&mut self, now_ms: u64, max_age: Duration) -> usize {
        let max_age_ms = u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX);
        let removed = self.remove_where(|entry| entry.idle_ms(now_ms) > max_age_ms);

        debug!(removed, max_age_secs = max_age.as_secs(), "expiry sweep");
        removed
    }

    // == Cleanup Old ==
    /// Evicts from the LRU end until at most `max_entries` remain.
    pub fn cleanup_old_entries(&mut self, max_entries: usize) -> usize {
        let evicted = self.evict_while(|store| store.len() > max_entries, 0);

        debug!(evicted, max_entries, "count-cap sweep");
        evicted
    }
}
