use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record stored in the `users` table. Internal only: the
/// password hash never crosses the API boundary, so this struct is not serialized
/// into any response.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    // The user's primary identifier. Unique index enforced by the store.
    pub email: String,
    pub name: String,
    // bcrypt hash. The plaintext password is never persisted or logged.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Post
///
/// A blog post record from the `posts` table. This is the primary wire type for the
/// blog endpoints; the JSON shape is camelCase (`authorId`, `createdAt`) to match
/// the contract the TypeScript frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    // FK to users.id (the authenticated author bound at creation time).
    pub author_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// SignupRequest
///
/// Input payload for POST /api/v1/user/signup. The `username` field carries the
/// user's email address, mirroring the shared frontend schema.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

impl SignupRequest {
    /// validate
    ///
    /// Shape validation with the same minimum-length constraints the frontend
    /// schema applies: username >= 3 chars, password >= 8, name >= 2.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.username.chars().count() < 3 {
            errors.push(FieldError::new(
                "username",
                "Username must be at least 3 characters",
            ));
        }
        if self.password.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        if self.name.chars().count() < 2 {
            errors.push(FieldError::new("name", "Name must be at least 2 characters"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

/// SigninRequest
///
/// Input payload for POST /api/v1/user/signin.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

impl SigninRequest {
    /// validate
    ///
    /// Signin requires the username to look like an email address and the password
    /// to meet the minimum length. The email check is intentionally shallow; the
    /// credential lookup is the real gate.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !self.username.contains('@') {
            errors.push(FieldError::new("username", "Invalid email format"));
        }
        if self.password.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

/// CreateBlogRequest
///
/// Input payload for POST /api/v1/blog. The author is *not* part of the payload:
/// it is taken from the authenticated identity bound by the middleware, so a client
/// cannot publish on behalf of another user.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.title.chars().count() < 3 {
            errors.push(FieldError::new(
                "title",
                "Title must be at least 3 characters long",
            ));
        }
        if self.content.chars().count() < 10 {
            errors.push(FieldError::new(
                "content",
                "Content must be at least 10 characters long",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

/// UpdateBlogRequest
///
/// Input payload for PUT /api/v1/blog. The `id` arrives as a string and is parsed
/// during validation so a malformed identifier surfaces as a 400 field error rather
/// than a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBlogRequest {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl UpdateBlogRequest {
    /// validate
    ///
    /// Returns the parsed post id on success so the handler never touches the raw
    /// string form again.
    pub fn validate(&self) -> Result<Uuid, ApiError> {
        let mut errors = Vec::new();
        let parsed = Uuid::parse_str(&self.id);
        if parsed.is_err() {
            errors.push(FieldError::new("id", "Invalid blog ID"));
        }
        if self.title.chars().count() < 3 {
            errors.push(FieldError::new(
                "title",
                "Title must be at least 3 characters long",
            ));
        }
        if self.content.chars().count() < 10 {
            errors.push(FieldError::new(
                "content",
                "Content must be at least 10 characters long",
            ));
        }
        match (parsed, errors.is_empty()) {
            (Ok(id), true) => Ok(id),
            _ => Err(ApiError::validation(errors)),
        }
    }
}

// --- Response Payloads (Output Schemas) ---

/// AuthResponse
///
/// Output of both signup and signin: a human-readable message plus the signed JWT
/// the client stores and replays in the `authorization` header.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthResponse {
    pub message: String,
    pub jwt: String,
}

/// CreateBlogResponse
///
/// Output of POST /api/v1/blog: the id of the freshly created post, keyed `blogId`
/// for API compatibility.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateBlogResponse {
    #[serde(rename = "blogId")]
    pub blog_id: Uuid,
}

/// UpdateBlogResponse
///
/// Output of PUT /api/v1/blog: the id of the updated post.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBlogResponse {
    pub id: Uuid,
}

/// BlogResponse
///
/// Output of GET /api/v1/blog/{id}: the post wrapped in a `blog` envelope, matching
/// the shape the frontend detail view expects.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BlogResponse {
    pub blog: Post,
}
