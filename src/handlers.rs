use std::time::Duration;

use axum::{Json, extract::Path, extract::State};
use bcrypt::{DEFAULT_COST, hash, verify};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AuthUser, issue_token},
    error::{ApiError, is_unique_violation},
    models::{
        AuthResponse, BlogResponse, CreateBlogRequest, CreateBlogResponse, Post, SigninRequest,
        SignupRequest, UpdateBlogRequest, UpdateBlogResponse,
    },
};

/// root
///
/// [Public Route] Plain-text liveness response at the application root.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn root() -> &'static str {
    "Blog API is running"
}

/// token_ttl
///
/// The configured token lifetime, if any. Kept in one place so signup and signin
/// issue identically-shaped tokens.
fn token_ttl(state: &AppState) -> Option<Duration> {
    state.config.token_ttl_secs.map(Duration::from_secs)
}

/// signup
///
/// [Public Route] Registers a new user and returns a signed token for immediate use.
///
/// Flow: validate input shape, bcrypt-hash the password, insert the user, issue a
/// token bound to the new user's id. Duplicate emails are detected by the unique
/// index on `users.email`; the resulting constraint violation maps to 409. There is
/// no read-before-insert, so concurrent signups for the same email cannot both win.
#[utoipa::path(
    post,
    path = "/api/v1/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Registered", body = AuthResponse),
        (status = 400, description = "Invalid request body"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let password_hash = hash(&payload.password, DEFAULT_COST)?;

    let user = state
        .repo
        .create_user(&payload.username, &payload.name, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                tracing::warn!("signup conflict for existing email");
                ApiError::Conflict("User already exists with this email".to_string())
            } else {
                e.into()
            }
        })?;

    let token = issue_token(user.id, &state.config.jwt_secret, token_ttl(&state))?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(AuthResponse {
        message: "Signup successful".to_string(),
        jwt: token,
    }))
}

/// signin
///
/// [Public Route] Authenticates an existing user and returns a fresh token.
///
/// An unknown email and a wrong password produce the identical 401 response, so the
/// endpoint cannot be used to enumerate accounts. Password comparison goes through
/// bcrypt's constant-time verify.
#[utoipa::path(
    post,
    path = "/api/v1/user/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let user = state
        .repo
        .find_user_by_email(&payload.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "signin rejected: bad password");
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issue_token(user.id, &state.config.jwt_secret, token_ttl(&state))?;

    tracing::info!(user_id = %user.id, "user signed in");
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        jwt: token,
    }))
}

/// create_blog
///
/// [Authenticated Route] Creates a new post. The author is the identity bound by the
/// auth middleware, never a client-supplied field, so a valid token is the only way
/// to attribute a post.
#[utoipa::path(
    post,
    path = "/api/v1/blog",
    request_body = CreateBlogRequest,
    responses(
        (status = 200, description = "Created", body = CreateBlogResponse),
        (status = 400, description = "Invalid request body"),
        (status = 403, description = "Unauthorized")
    )
)]
pub async fn create_blog(
    AuthUser { id: author_id }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<Json<CreateBlogResponse>, ApiError> {
    payload.validate()?;

    let post = state
        .repo
        .create_post(&payload.title, &payload.content, author_id)
        .await?;

    Ok(Json(CreateBlogResponse { blog_id: post.id }))
}

/// update_blog
///
/// [Authenticated Route] Updates the title and content of an existing post.
///
/// *Authorization*: the stored `author_id` is compared against the bound identity
/// before any mutation; a mismatch is a 403, a missing post a 404.
#[utoipa::path(
    put,
    path = "/api/v1/blog",
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated", body = UpdateBlogResponse),
        (status = 400, description = "Invalid request body"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn update_blog(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<UpdateBlogResponse>, ApiError> {
    let post_id = payload.validate()?;

    let existing = state
        .repo
        .get_post(post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog post not found".to_string()))?;

    if existing.author_id != user_id {
        tracing::warn!(user_id = %user_id, post_id = %post_id, "update rejected: not the author");
        return Err(ApiError::Forbidden(
            "You can only modify your own posts".to_string(),
        ));
    }

    let updated = state
        .repo
        .update_post(post_id, &payload.title, &payload.content)
        .await?
        // The post vanished between the ownership check and the update.
        .ok_or_else(|| ApiError::NotFound("Blog post not found".to_string()))?;

    Ok(Json(UpdateBlogResponse { id: updated.id }))
}

/// list_blogs
///
/// [Authenticated Route] Returns every post, newest first. No pagination.
#[utoipa::path(
    get,
    path = "/api/v1/blog/bulk",
    responses((status = 200, description = "All posts", body = [Post]))
)]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.repo.list_posts().await?;
    Ok(Json(posts))
}

/// get_blog
///
/// [Authenticated Route] Retrieves a single post by id, wrapped in the `blog`
/// envelope the frontend detail view expects.
#[utoipa::path(
    get,
    path = "/api/v1/blog/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = BlogResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogResponse>, ApiError> {
    match state.repo.get_post(id).await? {
        Some(post) => Ok(Json(BlogResponse { blog: post })),
        None => Err(ApiError::NotFound("Blog post not found".to_string())),
    }
}
