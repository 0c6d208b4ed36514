//! StudyHive Cache - memoization store for generated study artifacts
//!
//! A byte-budgeted LRU key-value cache with source namespaces, statistics,
//! age and count based maintenance, and JSON snapshots, plus a small
//! loopback HTTP API for the rest of the app.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::KvStore;
pub use config::Config;
pub use tasks::spawn_maintenance_task;
