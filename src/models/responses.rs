//! Response DTOs for the cache API
//!
//! Defines the structure of outgoing HTTP response bodies. Statistics are
//! served straight from [`crate::cache::StatsReport`].

use std::path::Path;

use serde::Serialize;

use crate::cache::Usage;

/// Response body for cache hits (`GET /entries/:key`, `GET /quiz`, `GET /grade`)
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
    pub source: String,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source: source.into(),
        }
    }
}

/// Response body for writes (`PUT /entries/:key`, `PUT /quiz`, `PUT /grade`)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The stored key (the fingerprint for quiz and grade writes)
    pub key: String,
    /// Entries evicted to make room
    pub evicted: usize,
}

impl PutResponse {
    pub fn new(key: impl Into<String>, evicted: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored", key),
            key,
            evicted,
        }
    }
}

/// Response body for `DELETE /entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for `GET /entries/:key/exists`
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for `GET /sources/:source`
#[derive(Debug, Clone, Serialize)]
pub struct SourceResponse {
    pub source: String,
    /// Keys, most recently used first
    pub keys: Vec<String>,
    pub size_bytes: usize,
}

/// Response body for bulk removals (clears and maintenance sweeps)
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub message: String,
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(what: &str, removed: usize) -> Self {
        Self {
            message: format!("{}: removed {} entries", what, removed),
            removed,
        }
    }
}

/// Response body for `GET /capacity` and `PUT /capacity`
#[derive(Debug, Clone, Serialize)]
pub struct CapacityResponse {
    pub max_size_bytes: usize,
    pub size_bytes: usize,
    pub entries: usize,
    /// Entries evicted by the change (always 0 for reads)
    pub evicted: usize,
}

impl CapacityResponse {
    pub fn new(usage: Usage, evicted: usize) -> Self {
        Self {
            max_size_bytes: usage.max_size_bytes,
            size_bytes: usage.size_bytes,
            entries: usage.entries,
            evicted,
        }
    }
}

/// Response body for `POST /snapshot/save` and `POST /snapshot/load`
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub message: String,
    pub path: String,
    /// Entries held after the operation
    pub entries: usize,
}

impl SnapshotResponse {
    pub fn new(action: &str, path: &Path, entries: usize) -> Self {
        Self {
            message: format!("Snapshot {}", action),
            path: path.display().to_string(),
            entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_response_serialize() {
        let resp = EntryResponse::new("k", "v", "rules");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "k");
        assert_eq!(json["source"], "rules");
    }

    #[test]
    fn test_put_response_message() {
        let resp = PutResponse::new("my_key", 2);
        assert!(resp.message.contains("my_key"));
        assert_eq!(resp.evicted, 2);
    }

    #[test]
    fn test_removed_response_message() {
        let resp = RemovedResponse::new("Source 'rules' cleared", 3);
        assert_eq!(resp.message, "Source 'rules' cleared: removed 3 entries");
    }

    #[test]
    fn test_capacity_response_from_usage() {
        let usage = Usage { entries: 3, size_bytes: 12, max_size_bytes: 64 };
        let resp = CapacityResponse::new(usage, 1);
        assert_eq!(resp.entries, 3);
        assert_eq!(resp.size_bytes, 12);
        assert_eq!(resp.max_size_bytes, 64);
        assert_eq!(resp.evicted, 1);
    }

    #[test]
    fn test_snapshot_response_path() {
        let resp = SnapshotResponse::new("saved", Path::new("/tmp/c.json"), 4);
        assert_eq!(resp.path, "/tmp/c.json");
        assert_eq!(resp.message, "Snapshot saved");
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
