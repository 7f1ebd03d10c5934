use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
    response::IntoResponse,
};
use blog_api::{
    AppState,
    auth::{AuthUser, Claims, issue_token, verify_token},
    models::{Post, User},
    repository::Repository,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};
use uuid::Uuid;

// --- Mock Repository for Auth Logic ---

// The extractor never touches the store; this mock only exists to satisfy the
// AppState shape.
#[derive(Default)]
struct MockAuthRepo;

#[async_trait]
impl Repository for MockAuthRepo {
    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(None)
    }
    async fn create_user(
        &self,
        _email: &str,
        _name: &str,
        _password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        Ok(User::default())
    }
    async fn create_post(
        &self,
        _title: &str,
        _content: &str,
        _author_id: Uuid,
    ) -> Result<Post, sqlx::Error> {
        Ok(Post::default())
    }
    async fn update_post(
        &self,
        _id: Uuid,
        _title: &str,
        _content: &str,
    ) -> Result<Option<Post>, sqlx::Error> {
        Ok(None)
    }
    async fn get_post(&self, _id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        Ok(None)
    }
    async fn list_posts(&self) -> Result<Vec<Post>, sqlx::Error> {
        Ok(vec![])
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn create_app_state(jwt_secret: &str) -> AppState {
    let mut config = blog_api::config::AppConfig::default();
    config.jwt_secret = jwt_secret.to_string();

    AppState {
        repo: Arc::new(MockAuthRepo),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Signs claims directly, bypassing issue_token, for crafting edge-case tokens.
fn encode_claims(claims: &Claims, secret: &str) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

// --- Token Service Tests ---

#[test]
fn test_token_round_trip_without_expiry() {
    let token = issue_token(TEST_USER_ID, TEST_JWT_SECRET, None).unwrap();

    let claims = verify_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.id, TEST_USER_ID);
    assert!(claims.exp.is_none(), "no TTL configured, no exp claim");
}

#[test]
fn test_token_wrong_secret_fails() {
    let token = issue_token(TEST_USER_ID, TEST_JWT_SECRET, None).unwrap();

    let result = verify_token(&token, "a-completely-different-secret");
    assert!(result.is_err());
}

#[test]
fn test_token_with_ttl_carries_exp_and_verifies() {
    let token = issue_token(TEST_USER_ID, TEST_JWT_SECRET, Some(Duration::from_secs(3600))).unwrap();

    let claims = verify_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.id, TEST_USER_ID);
    let exp = claims.exp.expect("exp claim must be present");
    assert!(exp as u64 > unix_now());
}

#[test]
fn test_expired_token_fails() {
    let claims = Claims {
        id: TEST_USER_ID,
        iat: (unix_now() - 7200) as usize,
        exp: Some((unix_now() - 3600) as usize),
    };
    let token = encode_claims(&claims, TEST_JWT_SECRET);

    let result = verify_token(&token, TEST_JWT_SECRET);
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err().kind(),
        jsonwebtoken::errors::ErrorKind::ExpiredSignature
    ));
}

#[test]
fn test_malformed_token_fails() {
    assert!(verify_token("not-a-jwt", TEST_JWT_SECRET).is_err());
    assert!(verify_token("", TEST_JWT_SECRET).is_err());
}

// --- Extractor Tests ---

#[tokio::test]
async fn test_auth_success_with_bearer_token() {
    let token = issue_token(TEST_USER_ID, TEST_JWT_SECRET, None).unwrap();
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().id, TEST_USER_ID);
}

#[tokio::test]
async fn test_auth_success_with_bare_token() {
    // The middleware tolerates tokens presented without the Bearer prefix.
    let token = issue_token(TEST_USER_ID, TEST_JWT_SECRET, None).unwrap();
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&token).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().id, TEST_USER_ID);
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    let response = auth_user.unwrap_err().into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_auth_failure_with_garbage_token() {
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Bearer definitely.not.valid"),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert!(auth_user.is_err());
}

#[tokio::test]
async fn test_auth_failure_with_token_from_other_secret() {
    let token = issue_token(TEST_USER_ID, "the-wrong-secret-entirely", None).unwrap();
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert!(auth_user.is_err());
}

#[tokio::test]
async fn test_auth_failure_with_expired_token() {
    let claims = Claims {
        id: TEST_USER_ID,
        iat: (unix_now() - 7200) as usize,
        exp: Some((unix_now() - 3600) as usize),
    };
    let token = encode_claims(&claims, TEST_JWT_SECRET);
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert!(auth_user.is_err());
}

#[tokio::test]
async fn test_auth_failure_with_nil_id_claim() {
    // Structurally valid token, but the identity claim is empty.
    let claims = Claims {
        id: Uuid::nil(),
        iat: unix_now() as usize,
        exp: None,
    };
    let token = encode_claims(&claims, TEST_JWT_SECRET);
    let app_state = create_app_state(TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/api/v1/blog/bulk".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert!(auth_user.is_err());
}
