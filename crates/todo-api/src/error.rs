//! Service error type and its HTTP mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use cacher::CacheError;

/// Unified error type for the todo service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Cache layer failed hard; soft cache failures degrade to
    /// repository reads and never surface here
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Durable store failed
    #[error("repository error: {0}")]
    Repository(String),

    /// Request payload failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Cache(CacheError::ConnectionExhausted { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Cache(_) | ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Convenience Result type for handlers
pub type Result<T> = std::result::Result<T, ApiError>;
