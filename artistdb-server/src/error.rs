//! Error types for artistdb-server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Service-level errors (startup, watcher, reload)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("File watch error: {0}")]
    Watch(String),

    #[error(transparent)]
    Common(#[from] artistdb_common::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown artist or alias (404)
    #[error("Artist not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<artistdb_common::Error> for ApiError {
    fn from(err: artistdb_common::Error) -> Self {
        match err {
            artistdb_common::Error::NotFound(name) => ApiError::NotFound(name),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(ref msg) => {
                tracing::error!("Request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
