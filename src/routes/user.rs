use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// Identity Router Module
///
/// Defines the unauthenticated identity endpoints, mounted under `/api/v1/user`.
/// These are the only routes that issue tokens; everything under `/api/v1/blog`
/// consumes them.
///
/// Security Mandate:
/// Passwords arriving here are bcrypt-hashed before they touch the store and are
/// never logged. Credential failures return a single undifferentiated 401 so the
/// endpoints cannot be used to probe which emails are registered.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // POST /api/v1/user/signup
        // Registers a new user. Uniqueness of the email is enforced by the store's
        // unique index; a duplicate surfaces as 409 Conflict.
        .route("/signup", post(handlers::signup))
        // POST /api/v1/user/signin
        // Verifies credentials against the stored bcrypt hash and issues a token.
        .route("/signin", post(handlers::signin))
}
