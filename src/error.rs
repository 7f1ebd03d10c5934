use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;
use utoipa::ToSchema;

/// FieldError
///
/// A single field-level validation failure, returned inside the `details` array of a
/// 400 response so clients can surface per-field messages next to their form inputs.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// ApiError
///
/// The application-wide error taxonomy. Every handler returns `Result<_, ApiError>`,
/// and all store, hashing, and token errors are converted into one of these variants
/// at the handler boundary. Internal detail is logged server-side and never leaked
/// to the client beyond a generic message.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input. Carries structured field errors.
    Validation(Vec<FieldError>),
    /// A unique key (the user's email) is already taken.
    Conflict(String),
    /// Missing, invalid, or expired credential.
    Unauthorized(String),
    /// Authenticated, but not permitted to touch this resource.
    Forbidden(String),
    /// The requested resource does not exist.
    NotFound(String),
    /// Backing-store failure. Surfaced as a 500 with a generic message.
    Store(sqlx::Error),
    /// Token signing failure. Verification failures are handled by the middleware.
    Token(jsonwebtoken::errors::Error),
    /// Password hashing failure.
    Hash(bcrypt::BcryptError),
}

impl ApiError {
    /// validation
    ///
    /// Convenience constructor used by the request models' `validate()` methods.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request body", "details": details }),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            // 404 keeps the `message` key used by the original blog API contract.
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ApiError::Store(e) => {
                tracing::error!("store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ApiError::Token(e) => {
                tracing::error!("token error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ApiError::Hash(e) => {
                tracing::error!("hash error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Store(e)
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        ApiError::Token(e)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        ApiError::Hash(e)
    }
}

/// is_unique_violation
///
/// Detects a Postgres unique-constraint violation. Signup relies on the unique index
/// on `users.email` as the single source of truth for duplicate detection, so a
/// check-then-insert race cannot admit two users with the same email; this helper
/// turns that constraint signal into a `Conflict` at the handler.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
