//! Maintenance Task
//!
//! Background task that periodically runs the cache's expiry and count-cap
//! sweeps. The sweeps themselves are synchronous calls on [`KvStore`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::KvStore;
use crate::config::Config;

// == Maintenance Policy ==
/// What one sweep does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenancePolicy {
    /// Entries idle longer than this are dropped
    pub max_age: Duration,
    /// If set, the LRU end is evicted down to this many entries
    pub max_entries: Option<usize>,
}

impl MaintenancePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_age: config.max_age(),
            max_entries: config.max_entries,
        }
    }

    /// Runs one sweep. Returns `(expired, evicted)`.
    pub fn run(&self, cache: &KvStore) -> (usize, usize) {
        let expired = cache.cleanup_expired_entries(self.max_age);
        let evicted = self
            .max_entries
            .map_or(0, |max_entries| cache.cleanup_old_entries(max_entries));
        (expired, evicted)
    }
}

/// Spawns a background task that sweeps the cache every `interval_secs`.
///
/// The first sweep happens one full interval after spawning.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(KvStore::default());
/// let handle = spawn_maintenance_task(cache.clone(), 3600, policy);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task(
    cache: Arc<KvStore>,
    interval_secs: u64,
    policy: MaintenancePolicy,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting maintenance task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (expired, evicted) = policy.run(&cache);

            if expired + evicted > 0 {
                info!(
                    "Maintenance: removed {} expired and {} over-cap entries",
                    expired, evicted
                );
            } else {
                debug!("Maintenance: nothing to remove");
            }
        }
    })
}
