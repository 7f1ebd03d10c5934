use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::config::AppConfig;

/// Claims
///
/// The payload signed into every JSON Web Token issued by this service. The user id
/// is the only identity claim; verification is stateless, so any request-handling
/// node can validate a token with nothing but the shared secret.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The UUID of the authenticated user. This is the request-to-identity binding
    /// consumed by every protected handler.
    pub id: Uuid,
    /// Issued At: timestamp when the token was signed.
    pub iat: usize,
    /// Expiration Time: only present when a token TTL is configured. Tokens without
    /// it remain valid until the secret rotates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

/// unix_now
///
/// Seconds since the Unix epoch, used for the `iat` and `exp` claims.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// issue_token
///
/// Signs a compact HS256 token carrying the user's id. When `ttl` is `None` the
/// token has no expiry claim, which reproduces the original deployment's behavior;
/// passing a TTL embeds `exp = now + ttl`.
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    ttl: Option<Duration>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = unix_now();
    let claims = Claims {
        id: user_id,
        iat: now as usize,
        exp: ttl.map(|d| (now + d.as_secs()) as usize),
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// verify_token
///
/// Recomputes the signature against the secret and decodes the claims. Fails on a
/// malformed token, a signature mismatch, or an elapsed `exp` claim.
///
/// The `exp` claim is optional here: the library's default validation requires it,
/// but this service must accept the no-expiry tokens it issues by default. Expiry
/// is therefore checked manually when the claim is present.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = false;

    let token_data = decode::<Claims>(token, &key, &validation)?;

    if let Some(exp) = token_data.claims.exp {
        if (exp as u64) < unix_now() {
            return Err(jsonwebtoken::errors::Error::from(
                ErrorKind::ExpiredSignature,
            ));
        }
    }

    Ok(token_data.claims)
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the user id decoded from a
/// verified bearer token. Bound per request by the extractor below and destroyed at
/// the end of the request; nothing is shared between requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

/// AuthRejection
///
/// The single rejection shape for the auth gate: HTTP 403 with the
/// `{"error": "Unauthorized"}` body. Every failure mode (missing header, malformed
/// token, bad signature, expired token, empty id claim) collapses into this one
/// response so the client learns nothing about which check failed.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, Json(json!({ "error": "Unauthorized" }))).into_response()
    }
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a function
/// argument in any protected handler. The blog router applies this extractor as a
/// middleware layer, so no handler behind it runs without a verified identity.
///
/// Protocol:
/// 1. Read the `authorization` header; absent means rejection.
/// 2. Strip a literal `Bearer ` prefix if present, otherwise use the raw value,
///    then trim surrounding whitespace.
/// 3. Verify the token with the shared secret.
/// 4. Require a non-nil user id claim, then bind it to the request.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the JWT secret).
    AppConfig: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                tracing::debug!("auth rejected: missing authorization header");
                AuthRejection
            })?;

        // Tolerate both `Bearer <token>` and a bare token.
        let token = auth_header
            .strip_prefix("Bearer ")
            .unwrap_or(auth_header)
            .trim();

        let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
            tracing::debug!("auth rejected: {:?}", e.kind());
            AuthRejection
        })?;

        // A structurally valid token must still carry a usable identity.
        if claims.id.is_nil() {
            tracing::debug!("auth rejected: empty id claim");
            return Err(AuthRejection);
        }

        Ok(AuthUser { id: claims.id })
    }
}
