// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

/// API error types
///
/// The three token variants carry fixed messages so the client can tell
/// "refresh and retry" (expired) apart from "force re-login" (missing/invalid).
#[derive(Debug)]
pub enum ApiError {
    /// Cookie session is absent or no longer valid
    Unauthorized(String),
    /// No bearer token in the Authorization header
    TokenMissing,
    /// Bearer token signature is valid but the token has expired
    TokenExpired,
    /// Bearer token is malformed or signed with the wrong key
    TokenInvalid,
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    StorageError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::TokenMissing => write!(f, "Unauthorized: access token required"),
            ApiError::TokenExpired => write!(f, "Unauthorized: token expired"),
            ApiError::TokenInvalid => write!(f, "Unauthorized: invalid token"),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "Access token required".to_string(),
                "TOKEN_MISSING",
            ),
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Token expired".to_string(),
                "TOKEN_EXPIRED",
            ),
            ApiError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "Invalid token".to_string(),
                "TOKEN_INVALID",
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::StorageError(msg) => {
                error!(error = %msg, "Storage error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage operation failed".to_string(),
                    "STORAGE_ERROR",
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
