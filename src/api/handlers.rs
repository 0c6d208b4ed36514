//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{KvStore, StatsReport};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::keys::{self, GradeKey, QuizKey};
use crate::models::requests::{validate_grade_key, validate_quiz_key};
use crate::models::{
    CacheGradeRequest, CacheQuizRequest, CapacityRequest, CapacityResponse, DeleteResponse,
    EntryResponse, ExistsResponse, ExpireRequest, HealthResponse, PutEntryRequest, PutResponse,
    RemovedResponse, SnapshotResponse, SourceResponse, TrimRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache
    pub cache: Arc<KvStore>,
    /// Snapshot file used by the snapshot endpoints
    pub snapshot_path: PathBuf,
    /// Expiry age used when a sweep request names none
    pub default_max_age: Duration,
}

impl AppState {
    /// Creates a new AppState around `cache` with default settings.
    pub fn new(cache: KvStore) -> Self {
        let defaults = Config::default();
        let default_max_age = defaults.max_age();
        Self {
            cache: Arc::new(cache),
            snapshot_path: defaults.snapshot_path,
            default_max_age,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache: Arc::new(KvStore::new(config.max_size_bytes)),
            snapshot_path: config.snapshot_path.clone(),
            default_max_age: config.max_age(),
        }
    }

    /// Points the snapshot endpoints at `path`.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }
}

// == Entry Handlers ==

/// Handler for PUT /entries/:key
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutEntryRequest>,
) -> Json<PutResponse> {
    let evicted = state.cache.put(key.as_str(), req.value, req.source);
    Json(PutResponse::new(key, evicted))
}

/// Handler for GET /entries/:key
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let hit = state
        .cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(EntryResponse::new(key, hit.value, hit.source)))
}

/// Handler for DELETE /entries/:key
pub async fn delete_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.remove(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for GET /entries/:key/exists
///
/// Does not count as a lookup and does not promote the entry.
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.exists(&key);
    Json(ExistsResponse { key, exists })
}

/// Handler for DELETE /entries
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clear();
    Json(RemovedResponse::new("Cache cleared", removed))
}

// == Namespace Handlers ==

/// Handler for GET /sources/:source
pub async fn source_handler(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Json<SourceResponse> {
    let (keys, size_bytes) = state.cache.source_summary(&source);
    Json(SourceResponse {
        source,
        keys,
        size_bytes,
    })
}

/// Handler for DELETE /sources/:source
pub async fn clear_source_handler(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Json<RemovedResponse> {
    let removed = state.cache.clear_by_source(&source);
    Json(RemovedResponse::new(
        &format!("Source '{}' cleared", source),
        removed,
    ))
}

// == Statistics Handlers ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsReport> {
    Json(state.cache.stats())
}

/// Handler for POST /stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<StatsReport> {
    state.cache.reset_stats();
    Json(state.cache.stats())
}

// == Capacity Handlers ==

/// Handler for GET /capacity
pub async fn get_capacity_handler(State(state): State<AppState>) -> Json<CapacityResponse> {
    Json(CapacityResponse::new(state.cache.usage(), 0))
}

/// Handler for PUT /capacity
pub async fn set_capacity_handler(
    State(state): State<AppState>,
    Json(req): Json<CapacityRequest>,
) -> Json<CapacityResponse> {
    let (evicted, usage) = state.cache.resize(req.max_size_bytes);
    Json(CapacityResponse::new(usage, evicted))
}

// == Maintenance Handlers ==

/// Handler for POST /maintenance/expire
pub async fn expire_handler(
    State(state): State<AppState>,
    Json(req): Json<ExpireRequest>,
) -> Json<RemovedResponse> {
    let max_age = req
        .max_age_secs
        .map(Duration::from_secs)
        .unwrap_or(state.default_max_age);
    let removed = state.cache.cleanup_expired_entries(max_age);
    Json(RemovedResponse::new("Expired entries swept", removed))
}

/// Handler for POST /maintenance/trim
pub async fn trim_handler(
    State(state): State<AppState>,
    Json(req): Json<TrimRequest>,
) -> Json<RemovedResponse> {
    let removed = state.cache.cleanup_old_entries(req.max_entries);
    Json(RemovedResponse::new("Cache trimmed", removed))
}

// == Snapshot Handlers ==

/// Handler for POST /snapshot/save
pub async fn save_snapshot_handler(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>> {
    let cache = state.cache.clone();
    let path = state.snapshot_path.clone();

    tokio::task::spawn_blocking(move || cache.save_to_file(&path))
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))??;

    Ok(Json(SnapshotResponse::new(
        "saved",
        &state.snapshot_path,
        state.cache.size(),
    )))
}

/// Handler for POST /snapshot/load
///
/// On failure the cache is left untouched.
pub async fn load_snapshot_handler(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>> {
    let cache = state.cache.clone();
    let path = state.snapshot_path.clone();

    tokio::task::spawn_blocking(move || cache.load_from_file(&path))
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))??;

    Ok(Json(SnapshotResponse::new(
        "loaded",
        &state.snapshot_path,
        state.cache.size(),
    )))
}

// == Quiz and Grade Handlers ==

/// Handler for PUT /quiz
pub async fn cache_quiz_handler(
    State(state): State<AppState>,
    Json(req): Json<CacheQuizRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let evicted = keys::cache_quiz(&state.cache, &req.key, req.quiz);
    Ok(Json(PutResponse::new(req.key.cache_key(), evicted)))
}

/// Handler for GET /quiz
pub async fn get_quiz_handler(
    State(state): State<AppState>,
    Query(key): Query<QuizKey>,
) -> Result<Json<EntryResponse>> {
    if let Some(error_msg) = validate_quiz_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let fingerprint = key.cache_key();
    let hit = keys::get_cached_quiz(&state.cache, &key)
        .ok_or_else(|| CacheError::NotFound(fingerprint.clone()))?;

    Ok(Json(EntryResponse::new(fingerprint, hit.value, hit.source)))
}

/// Handler for PUT /grade
pub async fn cache_grade_handler(
    State(state): State<AppState>,
    Json(req): Json<CacheGradeRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let evicted = keys::cache_grade(&state.cache, &req.key, req.grade);
    Ok(Json(PutResponse::new(req.key.cache_key(), evicted)))
}

/// Handler for GET /grade
pub async fn get_grade_handler(
    State(state): State<AppState>,
    Query(key): Query<GradeKey>,
) -> Result<Json<EntryResponse>> {
    if let Some(error_msg) = validate_grade_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let fingerprint = key.cache_key();
    let hit = keys::get_cached_grade(&state.cache, &key)
        .ok_or_else(|| CacheError::NotFound(fingerprint.clone()))?;

    Ok(Json(EntryResponse::new(fingerprint, hit.value, hit.source)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
