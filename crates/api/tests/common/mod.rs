//! Shared test harness.
//!
//! Builds the real application router (full middleware stack) over the
//! per-test database pool, mints JWTs directly from a test config, and
//! provides request/response helpers for `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use kawepla_api::auth::jwt::{generate_access_token, JwtConfig};
use kawepla_api::config::ServerConfig;
use kawepla_api::router::build_app_router;
use kawepla_api::state::AppState;
use kawepla_core::types::Timestamp;
use kawepla_db::models::user::CreateUser;
use kawepla_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-not-for-production".to_string(),
        access_token_expiry_mins: 15,
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user and mint a matching bearer token.
pub async fn seed_user_with_token(
    pool: &PgPool,
    email: &str,
    role: &str,
    subscription_tier: Option<&str>,
    subscription_end_date: Option<Timestamp>,
) -> (i64, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or("user").to_string(),
            role: Some(role.to_string()),
            subscription_tier: subscription_tier.map(str::to_string),
            subscription_end_date,
        },
    )
    .await
    .unwrap();

    let token = generate_access_token(user.id, role, &test_jwt_config()).unwrap();
    (user.id, token)
}

pub async fn seed_admin(pool: &PgPool) -> (i64, String) {
    seed_user_with_token(pool, "admin@kawepla.test", "admin", None, None).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn with_bearer(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = with_bearer(Request::builder().uri(uri), Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let request = with_bearer(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json"),
        token,
    )
    .body(Body::from(body.to_string()))
    .unwrap();
    send(app, request).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let request = with_bearer(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json"),
        token,
    )
    .body(Body::from(body.to_string()))
    .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response {
    let request = with_bearer(Request::builder().method("DELETE").uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
