//! Cache Store Module
//!
//! Main cache engine combining a key index with the arena recency list and
//! byte accounting. `CacheStore` is not synchronized; [`crate::cache::KvStore`]
//! owns one behind a mutex.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, LruList, StatsReport};

// == Cached Value ==
/// Payload and source tag returned by a cache hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    pub value: String,
    pub source: String,
}

// == Cache Store ==
/// Byte-bounded LRU store.
///
/// Capacity policy: inserting a new key evicts from the least recently used
/// end until the newcomer fits or the store is empty. A single entry larger
/// than the whole capacity is still admitted, so the store can hold one
/// over-budget entry until the next insertion pushes it out.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Entries in recency order, MRU at the front
    order: LruList<CacheEntry>,
    /// Sum of `size_bytes` over live entries
    size_bytes: usize,
    /// Byte budget
    max_size_bytes: usize,
    /// Hit/miss/eviction counters
    counters: CacheCounters,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store with the given byte budget.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            index: HashMap::new(),
            order: LruList::new(),
            size_bytes: 0,
            max_size_bytes,
            counters: CacheCounters::new(),
        }
    }

    // == Put ==
    /// Stores `value` under `key`, tagged with `source`.
    ///
    /// An existing key is updated in place and promoted. Returns the number
    /// of entries evicted to make room.
    pub fn put(&mut self, key: String, value: String, source: String) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(idx) {
                self.size_bytes -= entry.size_bytes;
                entry.replace(value, source);
                self.size_bytes += entry.size_bytes;
            }
            self.order.move_to_front(idx);

            // The updated entry sits at the front, so it is the last to go.
            return self.evict_while(|store| store.size_bytes > store.max_size_bytes, 1);
        }

        let entry = CacheEntry::new(key, value, source);
        let incoming = entry.size_bytes;
        let evicted = self.evict_while(
            |store| store.size_bytes + incoming > store.max_size_bytes,
            0,
        );

        self.insert_front(entry);
        evicted
    }

    // == Get ==
    /// Looks up `key`, promoting it on a hit. Hits and misses are counted.
    pub fn get(&mut self, key: &str) -> Option<CachedValue> {
        let Some(&idx) = self.index.get(key) else {
            self.counters.record_miss();
            return None;
        };

        let hit = self.order.get_mut(idx).map(|entry| {
            entry.touch();
            CachedValue {
                value: entry.value.clone(),
                source: entry.source.clone(),
            }
        });
        self.order.move_to_front(idx);
        self.counters.record_hit();
        hit
    }

    // == Remove ==
    /// Removes `key`. Returns false if it was not present.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.get(key).copied() {
            Some(idx) => self.remove_slot(idx).is_some(),
            None => false,
        }
    }

    // == Exists ==
    /// Presence check that leaves recency order and counters untouched.
    pub fn exists(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Reads an entry without promoting it or counting a lookup.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.index.get(key).and_then(|&idx| self.order.get(idx))
    }

    // == Sizes ==
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total bytes held.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    // == Set Capacity ==
    /// Changes the byte budget and evicts from the LRU end until the store
    /// fits. A budget of zero empties the store. Returns the eviction count.
    pub fn set_max_size_bytes(&mut self, max_size_bytes: usize) -> usize {
        self.max_size_bytes = max_size_bytes;
        self.evict_while(|store| store.size_bytes > store.max_size_bytes, 0)
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.size_bytes = 0;
    }

    // == Stats ==
    /// Builds the aggregate statistics report.
    pub fn stats(&self) -> StatsReport {
        StatsReport::build(
            &self.counters,
            self.entries().map(|e| (e.source.as_str(), e.size_bytes)),
            self.size_bytes,
            self.max_size_bytes,
        )
    }

    /// Zeroes hit, miss and eviction counters.
    pub fn reset_stats(&mut self) {
        self.counters.reset();
    }

    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    /// Adds counts carried over from a store this one replaces.
    pub(crate) fn absorb_counters(&mut self, prior: CacheCounters) {
        self.counters.hits += prior.hits;
        self.counters.misses += prior.misses;
        self.counters.evictions += prior.evictions;
    }

    // == Iteration ==
    /// Entries from most to least recently used.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> + '_ {
        self.order.iter().map(|(_, entry)| entry)
    }

    // == Restore ==
    /// Rebuilds a store from entries listed most recently used first.
    ///
    /// Callers must pass unique keys. If the entries overflow the budget the
    /// LRU end is trimmed under the same rule as `put`.
    pub(crate) fn restore(
        max_size_bytes: usize,
        entries: Vec<CacheEntry>,
        counters: CacheCounters,
    ) -> Self {
        let mut store = Self::new(max_size_bytes);
        store.counters = counters;

        for entry in entries {
            store.size_bytes += entry.size_bytes;
            let key = entry.key.clone();
            let idx = store.order.push_back(entry);
            store.index.insert(key, idx);
        }

        store.evict_while(|s| s.size_bytes > s.max_size_bytes, 1);
        store
    }

    // == Internal Helpers ==
    fn insert_front(&mut self, entry: CacheEntry) {
        self.size_bytes += entry.size_bytes;
        let key = entry.key.clone();
        let idx = self.order.push_front(entry);
        self.index.insert(key, idx);
    }

    /// Unlinks a slot and fixes up the index and byte total. Not an eviction.
    pub(crate) fn remove_slot(&mut self, idx: usize) -> Option<CacheEntry> {
        let entry = self.order.remove(idx)?;
        self.index.remove(&entry.key);
        self.size_bytes -= entry.size_bytes;
        Some(entry)
    }

    /// Evicts the least recently used entry and counts it.
    pub(crate) fn evict_lru(&mut self) -> Option<CacheEntry> {
        let idx = self.order.back()?;
        let entry = self.remove_slot(idx)?;
        self.counters.record_eviction();
        debug!(key = %entry.key, size_bytes = entry.size_bytes, "evicted LRU entry");
        Some(entry)
    }

    /// Evicts from the LRU end while `over` holds and more than `keep`
    /// entries remain.
    pub(crate) fn evict_while<F>(&mut self, over: F, keep: usize) -> usize
    where
        F: Fn(&Self) -> bool,
    {
        let mut evicted = 0;
        while self.len() > keep && over(self) {
            if self.evict_lru().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    /// Removes, in one pass, every entry matching `pred`. Remaining entries
    /// keep their relative order. Not counted as evictions.
    pub(crate) fn remove_where<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&CacheEntry) -> bool,
    {
        let doomed: Vec<usize> = self
            .order
            .iter()
            .filter(|(_, entry)| pred(entry))
            .map(|(idx, _)| idx)
            .collect();

        doomed
            .into_iter()
            .filter(|&idx| self.remove_slot(idx).is_some())
            .count()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.order.len(), "index/order length mismatch");

        let mut total = 0;
        for (idx, entry) in self.order.iter() {
            assert_eq!(self.index.get(&entry.key), Some(&idx), "index points elsewhere");
            assert_eq!(entry.size_bytes, entry.value.len(), "stale size_bytes");
            total += entry.size_bytes;
        }
        assert_eq!(self.order.iter().count(), self.order.len(), "broken links");
        assert_eq!(total, self.size_bytes, "byte total drifted");
    }
}
