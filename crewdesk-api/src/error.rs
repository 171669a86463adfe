/// Error handling for the API server
///
/// One unified error type that maps onto the four client-visible outcomes
/// plus an internal bucket. Handlers return `ApiResult<T>` and the
/// `IntoResponse` impl takes care of the HTTP shape.
///
/// Every error surfaces as a single-message payload:
///
/// ```json
/// { "error": "forbidden", "message": "Access denied to this project" }
/// ```
///
/// Token problems of any kind (malformed, expired, or a valid token
/// whose user no longer exists) collapse into the same 401 so callers
/// cannot distinguish a forged token from a deleted account.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crewdesk_shared::{
    auth::{jwt::JwtError, password::PasswordError},
    store::StoreError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad enum value, dangling reference, duplicate email (400)
    #[error("{0}")]
    Validation(String),

    /// Missing/invalid/expired token, or its user is gone (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking rights (403)
    #[error("{0}")]
    Forbidden(String),

    /// Resource id has no record (404)
    #[error("{0}")]
    NotFound(String),

    /// Anything the client cannot act on (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// The canonical 401 used for every credential failure
    pub fn credentials() -> Self {
        ApiError::Unauthorized("Could not validate credentials".to_string())
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "forbidden", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => {
                // Log the detail but keep it out of the response
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(_: JwtError) -> Self {
        ApiError::credentials()
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
