//! Error types for whinv-server
//!
//! Every error body has the shape `{ "error": string }`. Store failures are
//! logged in full here and reach the client only as a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500); only the message is sent to the client
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a repository error, using `public` as the client-facing message
    /// for store failures
    pub fn from_store(err: whinv_common::Error, public: &'static str) -> Self {
        match err {
            whinv_common::Error::Validation(msg) => ApiError::BadRequest(msg),
            whinv_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => {
                error!("{}: {}", public, other);
                ApiError::Internal(public)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err = ApiError::from_store(
            whinv_common::Error::Validation("name is required".to_string()),
            "Failed to create item",
        );
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "name is required"));

        let err = ApiError::from_store(
            whinv_common::Error::NotFound("item x".to_string()),
            "Failed to update item",
        );
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = ApiError::from_store(
            whinv_common::Error::Database(sqlx::Error::PoolTimedOut),
            "Failed to fetch items",
        );
        assert_eq!(err.to_string(), "Failed to fetch items");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("Failed to fetch items")
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
