//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_grade_handler, cache_quiz_handler, clear_handler, clear_source_handler,
    delete_entry_handler, exists_handler, expire_handler, get_capacity_handler,
    get_entry_handler, get_grade_handler, get_quiz_handler, health_handler,
    load_snapshot_handler, put_entry_handler, reset_stats_handler, save_snapshot_handler,
    set_capacity_handler, source_handler, stats_handler, trim_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT|GET|DELETE /entries/:key` - Store, fetch or remove one entry
/// - `GET /entries/:key/exists` - Presence check without side effects
/// - `DELETE /entries` - Remove every entry
/// - `GET|DELETE /sources/:source` - Inspect or clear one namespace
/// - `GET /stats`, `POST /stats/reset` - Statistics
/// - `GET|PUT /capacity` - Read or change the byte budget
/// - `POST /maintenance/expire`, `POST /maintenance/trim` - Manual sweeps
/// - `POST /snapshot/save`, `POST /snapshot/load` - Configured snapshot file
/// - `PUT|GET /quiz`, `PUT|GET /grade` - Fingerprinted study artifacts
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/entries", delete(clear_handler))
        .route(
            "/entries/:key",
            put(put_entry_handler)
                .get(get_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/entries/:key/exists", get(exists_handler))
        .route(
            "/sources/:source",
            get(source_handler).delete(clear_source_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/stats/reset", post(reset_stats_handler))
        .route(
            "/capacity",
            get(get_capacity_handler).put(set_capacity_handler),
        )
        .route("/maintenance/expire", post(expire_handler))
        .route("/maintenance/trim", post(trim_handler))
        .route("/snapshot/save", post(save_snapshot_handler))
        .route("/snapshot/load", post(load_snapshot_handler))
        .route("/quiz", put(cache_quiz_handler).get(get_quiz_handler))
        .route("/grade", put(cache_grade_handler).get(get_grade_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
