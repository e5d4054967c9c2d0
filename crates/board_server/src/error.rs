//! Error types and handling for the board server.
//!
//! [`ServerError`] covers failures of the server itself (binding, serving).
//! [`ApiError`] covers failures of a single request and renders as the JSON
//! error envelope the client expects.

use crate::response::FieldError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use board_store::StoreError;
use serde_json::json;
use tracing::error;

/// Enumeration of possible server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Network-related errors such as binding failures
    #[error("Network error: {0}")]
    Network(String),

    /// Internal server errors such as invalid configuration
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A request that could not be served.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Too many requests from this IP, please try again later.")]
    RateLimited,

    /// Details are logged, never sent to the client
    #[error("Something went wrong on the server")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => ApiError::NotFound(format!("{kind} not found")),
            StoreError::Conflict(message) => ApiError::BadRequest(message),
            StoreError::DepthExceeded(_) | StoreError::InvalidParent(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StoreError::Snapshot(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!({
                "success": false,
                "message": self.to_string(),
                "errors": errors,
            }),
            ApiError::Internal(detail) => {
                error!("❌ Request failed: {}", detail);
                json!({
                    "success": false,
                    "message": self.to_string(),
                    "data": null,
                })
            }
            _ => json!({
                "success": false,
                "message": self.to_string(),
                "data": null,
            }),
        };

        (status, Json(body)).into_response()
    }
}
