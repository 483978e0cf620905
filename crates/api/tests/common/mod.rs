#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use lembranca_api::auth::jwt::JwtConfig;
use lembranca_api::auth::password::hash_password;
use lembranca_api::config::ServerConfig;
use lembranca_api::router::build_app_router;
use lembranca_api::state::AppState;
use lembranca_db::models::admin_user::{AdminUser, CreateAdminUser};
use lembranca_db::repositories::AdminUserRepo;

pub const TEST_PASSWORD: &str = "senha-segura-123";
pub const TEST_BASE_URL: &str = "https://memorial.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// No Stripe key is set, so checkout runs against the mock provider.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: TEST_BASE_URL.to_string(),
        memorial_cache_ttl_secs: 60,
        invitation_expiry_days: 7,
        stripe: None,
        session_cleanup_interval_secs: 3600,
        bootstrap_admin: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, using the given database pool.
///
/// Goes through [`build_app_router`] so tests exercise the production
/// middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::POST, uri, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Insert an admin directly and return it.
pub async fn create_admin(pool: &PgPool, email: &str) -> AdminUser {
    AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            name: "Administrador".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("admin creation should succeed")
}

/// Log in through `path` and return the full auth response body.
pub async fn login(app: Router, path: &str, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        app,
        path,
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login to {path} should succeed");
    body_json(response).await
}

/// Create an admin and return its access token.
pub async fn admin_token(pool: &PgPool, app: Router) -> String {
    create_admin(pool, "admin@lembranca.test").await;
    let json = login(app, "/api/v1/auth/admin/login", "admin@lembranca.test", TEST_PASSWORD).await;
    json["access_token"].as_str().expect("access_token").to_string()
}

/// Register a funeral home through the API and return `(id, access_token)`.
pub async fn funeral_home_token(app: Router, email: &str) -> (i64, String) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/funeral-homes/register",
        serde_json::json!({
            "name": "Funerária Paz Eterna",
            "email": email,
            "password": TEST_PASSWORD,
            "phone": "(11) 3333-4444",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = login(app, "/api/v1/auth/funeral-homes/login", email, TEST_PASSWORD).await;
    (
        json["account"]["id"].as_i64().expect("account id"),
        json["access_token"].as_str().expect("access_token").to_string(),
    )
}

// ---------------------------------------------------------------------------
// Memorials
// ---------------------------------------------------------------------------

/// Create a memorial as `token` and return the `data` object of the response.
pub async fn create_memorial(app: Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/memorials", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create a memorial and set it active and public. Returns the memorial object.
pub async fn create_active_memorial(app: Router, token: &str, full_name: &str) -> serde_json::Value {
    let created = create_memorial(
        app.clone(),
        token,
        serde_json::json!({ "full_name": full_name, "birth_date": "1940-03-12", "death_date": "2024-08-01" }),
    )
    .await;
    let id = created["memorial"]["id"].as_i64().expect("memorial id");

    let response = put_json_auth(
        app,
        &format!("/api/v1/memorials/{id}"),
        token,
        serde_json::json!({ "status": "active" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}
