//! StudyHive Cache - local memoization service
//!
//! Boots the cache from its snapshot, serves the loopback API, and writes
//! the snapshot back on shutdown.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studyhive_cache::api::{create_router, AppState};
use studyhive_cache::cache::set_aside_snapshot;
use studyhive_cache::tasks::{spawn_maintenance_task, MaintenancePolicy};
use studyhive_cache::Config;

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and restore the snapshot if one exists
/// 4. Start background maintenance task
/// 5. Serve the API on 127.0.0.1
/// 6. On SIGINT/SIGTERM, stop the task and save the snapshot
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyhive_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting StudyHive cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size_bytes={}, max_age={}s, max_entries={:?}, port={}, maintenance_interval={}s",
        config.max_size_bytes,
        config.max_age_secs,
        config.max_entries,
        config.server_port,
        config.maintenance_interval
    );

    let state = AppState::from_config(&config);

    // Cleared when an unreadable snapshot could not be moved out of the way.
    let mut save_on_shutdown = true;

    if state.snapshot_path.exists() {
        if let Err(e) = state.cache.load_from_file(&state.snapshot_path) {
            warn!(
                path = %state.snapshot_path.display(),
                error = %e,
                "ignoring unreadable snapshot, starting empty"
            );
            match set_aside_snapshot(&state.snapshot_path) {
                Ok(moved) => warn!(path = %moved.display(), "unreadable snapshot kept"),
                Err(e) => {
                    warn!(error = %e, "could not move unreadable snapshot, shutdown save disabled");
                    save_on_shutdown = false;
                }
            }
        }
    } else {
        info!(path = %state.snapshot_path.display(), "no snapshot found, starting empty");
    }

    let maintenance_handle = spawn_maintenance_task(
        state.cache.clone(),
        config.maintenance_interval,
        MaintenancePolicy::from_config(&config),
    );
    info!("Background maintenance task started");

    let cache = state.cache.clone();
    let snapshot_path = state.snapshot_path.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(maintenance_handle))
        .await
        .context("server error")?;

    if save_on_shutdown {
        // A failed save is already logged; the process exits either way.
        let _ = tokio::task::spawn_blocking(move || cache.save_to_file(&snapshot_path)).await?;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the maintenance task and allows graceful shutdown.
async fn shutdown_signal(maintenance_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    maintenance_handle.abort();
    warn!("Maintenance task aborted");
}
