//! Custom error types for the catalog service

use auth::AuthError;
use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Custom error type for the catalog service
///
/// Every variant renders as `{"success": false, "message": ...}`; internal
/// errors also echo the underlying error text in `error`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid or rejected credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Referenced resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request body exceeds the configured limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Unexpected failure
    #[error("{message}: {error}")]
    Internal { message: String, error: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, error: impl Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            error: error.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::MissingKeyword => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredentials => ApiError::BadRequest(e.to_string()),
            AuthError::UserNotFound | AuthError::InvalidPassword => {
                ApiError::Unauthorized(e.to_string())
            }
            AuthError::InvalidToken(_) | AuthError::TokenRevoked => {
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            AuthError::Hashing(_) => ApiError::internal("Authentication failed", e),
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

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": message }),
            ),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "message": message }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": message }),
            ),
            ApiError::PayloadTooLarge(message) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "success": false, "message": message }),
            ),
            ApiError::Internal { message, error } => {
                error!("{}: {}", message, error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": message, "error": error }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
