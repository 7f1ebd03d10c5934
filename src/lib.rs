use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Module for routing segregation (public identity routes vs. protected blog routes).
pub mod routes;
use auth::AuthUser; // The resolved authenticated user identity.
use routes::{blog, user};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application from
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` annotations. The
/// resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root, handlers::signup, handlers::signin,
        handlers::create_blog, handlers::update_blog,
        handlers::list_blogs, handlers::get_blog,
    ),
    components(
        schemas(
            models::Post, models::SignupRequest, models::SigninRequest,
            models::AuthResponse, models::CreateBlogRequest, models::CreateBlogResponse,
            models::UpdateBlogRequest, models::UpdateBlogResponse, models::BlogResponse,
            error::FieldError,
        )
    ),
    tags(
        (name = "blog-api", description = "Blogging Platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all essential application
/// services and configuration. Cloned per request; nothing inside it is mutated
/// after startup.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow extractors and handlers to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the blog routes.
///
/// *Mechanism*: it attempts to extract `AuthUser` from the request. Since `AuthUser`
/// implements `FromRequestParts`, a failed verification rejects the request with
/// 403 `{"error":"Unauthorized"}` before any handler runs. On success the request
/// proceeds, and handlers re-extract the same `AuthUser` to read the bound identity.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Root liveness endpoint, plus /health for load balancer checks.
        .route("/", get(handlers::root))
        .route("/health", get(|| async { "ok" }))
        // Identity routes: no middleware applied.
        .nest("/api/v1/user", user::user_routes())
        // Blog routes: every route behind the bearer-token gate. This is the single
        // middleware contract for all protected paths.
        .nest(
            "/api/v1/blog",
            blog::blog_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in a span
                // carrying the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation: returns the x-request-id header to the
                // client so log lines can be correlated end to end.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation. It extracts the
/// `x-request-id` header (if present) and includes it in the structured logging
/// metadata alongside the HTTP method and URI, so every log line for a single
/// request is correlated by a unique id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
