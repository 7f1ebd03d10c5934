/// Router Module Index
///
/// Organizes the application's routing into security-segregated modules so access
/// control is applied explicitly at the module level (via Axum layers), preventing
/// accidental exposure of protected endpoints.

/// Identity routes (signup/signin) plus the root liveness endpoints. Anonymous.
pub mod user;

/// Blog content routes. Every route in this module sits behind the bearer-token
/// middleware layer applied in `create_router`.
pub mod blog;
