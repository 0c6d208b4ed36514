//! Cache Statistics Module
//!
//! Tracks lookup and eviction counters and builds the aggregate report,
//! including the per-source breakdown.

use std::collections::BTreeMap;

use serde::Serialize;

// == Cache Counters ==
/// Cumulative counters. Survive `clear()`, zeroed by `reset()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Lookups that found the key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Entries removed to honor a byte or count ceiling
    pub evictions: u64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates counters at zero.
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

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Source Stats ==
/// Entry count and bytes held under one source tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub entries: usize,
    pub size_bytes: usize,
}

// == Stats Report ==
/// Point-in-time view of the cache, as returned by `get_stats()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub total_entries: usize,
    pub total_size_bytes: usize,
    pub max_size_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    /// Breakdown keyed by source tag, sorted by tag
    pub sources: BTreeMap<String, SourceStats>,
}

impl StatsReport {
    // == Builder ==
    /// Builds a report from counters and an iterator of `(source, size_bytes)`
    /// pairs, one per live entry.
    pub fn build<'a, I>(
        counters: &CacheCounters,
        entries: I,
        total_size_bytes: usize,
        max_size_bytes: usize,
    ) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut sources: BTreeMap<String, SourceStats> = BTreeMap::new();
        let mut total_entries = 0;

        for (source, size) in entries {
            let agg = sources.entry(source.to_string()).or_default();
            agg.entries += 1;
            agg.size_bytes += size;
            total_entries += 1;
        }

        Self {
            total_entries,
            total_size_bytes,
            max_size_bytes,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            hit_rate: counters.hit_rate(),
            sources,
        }
    }

    /// Breakdown for one tag; zeroes for an unknown tag.
    pub fn source(&self, source: &str) -> SourceStats {
        self.sources.get(source).copied().unwrap_or_default()
    }
}
