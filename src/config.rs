//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{snapshot_path, DEFAULT_MAX_SIZE_BYTES, DEFAULT_MAX_AGE};

/// Cache service configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget of the cache
    pub max_size_bytes: usize,
    /// Idle age in seconds after which the sweep drops an entry
    pub max_age_secs: u64,
    /// Optional entry-count ceiling applied by the sweep
    pub max_entries: Option<usize>,
    /// Seconds between maintenance sweeps
    pub maintenance_interval: u64,
    /// Snapshot file loaded at boot and written at shutdown
    pub snapshot_path: PathBuf,
    /// HTTP server port (loopback only)
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE_BYTES` - Byte budget (default: 209715200, 200 MiB)
    /// - `CACHE_MAX_AGE_SECS` - Expiry age in seconds (default: 86400)
    /// - `CACHE_MAX_ENTRIES` - Entry-count ceiling (default: none)
    /// - `MAINTENANCE_INTERVAL` - Sweep frequency in seconds (default: 3600)
    /// - `SNAPSHOT_DIR` - Directory holding `studyhive_cache.json` (default: cwd)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_size_bytes: parse_var("CACHE_MAX_SIZE_BYTES").unwrap_or(defaults.max_size_bytes),
            max_age_secs: parse_var("CACHE_MAX_AGE_SECS").unwrap_or(defaults.max_age_secs),
            max_entries: parse_var("CACHE_MAX_ENTRIES"),
            maintenance_interval: parse_var("MAINTENANCE_INTERVAL")
                .unwrap_or(defaults.maintenance_interval),
            snapshot_path: env::var_os("SNAPSHOT_DIR")
                .map(|dir| snapshot_path(Some(PathBuf::from(dir).as_path())))
                .unwrap_or(defaults.snapshot_path),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Expiry age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_age_secs: DEFAULT_MAX_AGE.as_secs(),
            max_entries: None,
            maintenance_interval: 3600,
            snapshot_path: snapshot_path(None),
            server_port: 3000,
        }
    }
}
