//! Cache Module
//!
//! Byte-bounded LRU cache with source namespaces, maintenance sweeps and
//! JSON snapshots.

mod entry;
mod lru;
mod maintenance;
mod namespace;
pub mod persistence;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruList;
pub use maintenance::DEFAULT_MAX_AGE;
pub use persistence::{prune_snapshot_files, set_aside_snapshot, snapshot_path, SnapshotDocument};
pub use shared::{KvStore, Usage};
pub use stats::{CacheCounters, SourceStats, StatsReport};
pub use store::{CacheStore, CachedValue};

// == Public Constants ==
/// Default byte budget (200 MiB)
pub const DEFAULT_MAX_SIZE_BYTES: usize = 200 * 1024 * 1024;
