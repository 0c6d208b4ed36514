//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Snapshot file could not be read or written
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not a well-formed document
    #[error("Snapshot is malformed: {0}")]
    Parse(serde_json::Error),

    /// Snapshot was written by an incompatible format
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(String),

    /// Snapshot parsed but its contents are inconsistent
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// I/O failures surfaced through serde_json stay I/O failures.
impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            CacheError::Io(e.into())
        } else {
            CacheError::Parse(e)
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            CacheError::Parse(_)
            | CacheError::UnsupportedVersion(_)
            | CacheError::InvalidSnapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Io(_) | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            CacheError::Io(missing).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CacheError::InvalidSnapshot("dup".into()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            CacheError::InvalidRequest("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_json_io_error_maps_to_io() {
        let disk_full = std::io::Error::new(std::io::ErrorKind::Other, "no space left");
        let err = CacheError::from(serde_json::Error::io(disk_full));
        assert!(matches!(err, CacheError::Io(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let syntax = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        assert!(matches!(CacheError::from(syntax), CacheError::Parse(_)));
    }

    #[test]
    fn test_display_includes_detail() {
        let err = CacheError::UnsupportedVersion("2.0".into());
        assert_eq!(err.to_string(), "Unsupported snapshot version: 2.0");
    }
}
