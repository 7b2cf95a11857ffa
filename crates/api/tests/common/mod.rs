#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sitescore_api::auth::jwt::JwtConfig;
use sitescore_api::config::ServerConfig;
use sitescore_api::router::build_app_router;
use sitescore_api::state::AppState;
use sitescore_db::store::MemoryUserStore;
use tower::ServiceExt;

/// Peer address used when a test does not care which client is calling.
pub const DEFAULT_PEER: &str = "198.51.100.1:50000";

/// Default password used by [`register_user`].
pub const PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        trust_forwarded_for: false,
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            expiry_secs: 3600,
        },
    }
}

/// Build the full application router over a fresh in-memory store, returning
/// the state too so tests can reach the store directly.
pub fn build_test_app_with(config: ServerConfig) -> (Router, AppState) {
    let state = AppState::new(Arc::new(MemoryUserStore::new()), config.clone());
    (build_app_router(state.clone(), &config), state)
}

pub fn build_test_app() -> Router {
    build_test_app_with(test_config()).0
}

/// Send a request through the router as if it came from `peer`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
    peer: &str,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let mut request = builder.body(body).unwrap();
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None, DEFAULT_PEER).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, None, Some(token), DEFAULT_PEER).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body), None, DEFAULT_PEER).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(body), Some(token), DEFAULT_PEER).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user via the API and return the `{user, accessToken, expiresIn}` body.
pub async fn register_user(app: &Router, email: &str) -> Value {
    let body = serde_json::json!({
        "email": email,
        "password": PASSWORD,
        "firstName": "Test",
        "lastName": "User",
    });
    let response = post_json(app, "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Register a user and return only the access token.
pub async fn token_for(app: &Router, email: &str) -> String {
    register_user(app, email).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}
