use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Content Router Module
///
/// Defines the blog CRUD endpoints, mounted under `/api/v1/blog`.
///
/// Access Control Strategy:
/// The whole router is wrapped by the auth middleware layer in `create_router`, so
/// every handler here runs with a verified `AuthUser` available. Create uses the
/// bound identity as the author; update compares it against the stored author
/// before permitting the mutation.
pub fn blog_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /api/v1/blog   — create a post authored by the bound identity.
        // PUT  /api/v1/blog   — update a post (owner-only, id in the body).
        .route(
            "/",
            post(handlers::create_blog).put(handlers::update_blog),
        )
        // GET /api/v1/blog/bulk
        // Lists all posts, newest first. Registered before the parameterized route
        // so "bulk" is never interpreted as a post id.
        .route("/bulk", get(handlers::list_blogs))
        // GET /api/v1/blog/{id}
        // Fetches a single post by UUID.
        .route("/{id}", get(handlers::get_blog))
}
