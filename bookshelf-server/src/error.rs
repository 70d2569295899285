//! Error types for the bookshelf HTTP server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookshelf_core::CatalogError;
use thiserror::Error;
use tracing::error;

/// Request-level error, rendered as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (missing file, wrong content type, bad JSON)
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Catalog(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("No selected file".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CatalogError::UnsupportedFormat("a.txt".into())).status(),
            StatusCode::BAD_REQUEST
        );

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(
            ApiError::from(CatalogError::StorageWrite(io)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
