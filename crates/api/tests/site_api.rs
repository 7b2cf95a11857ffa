//! HTTP-level integration tests for `POST /site/evaluate` and its
//! one-free-request-per-address gate.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, send, token_for};
use serde_json::{json, Value};
use tower::ServiceExt;

const PEER_A: &str = "203.0.113.10:40000";
const PEER_B: &str = "203.0.113.11:40000";

fn evaluate_body(url: &str) -> Option<Value> {
    Some(json!({ "url": url }))
}

async fn evaluate(
    app: &axum::Router,
    url: &str,
    token: Option<&str>,
    peer: &str,
) -> axum::response::Response {
    send(app, Method::POST, "/site/evaluate", evaluate_body(url), token, peer).await
}

/// Only the first tokenless request from an address is let through.
#[tokio::test]
async fn test_first_request_is_free_second_requires_token() {
    let app = common::build_test_app();

    let response = evaluate(&app, "https://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = evaluate(&app, "https://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = evaluate(&app, "https://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The free pass is tracked per address, not per port.
#[tokio::test]
async fn test_free_pass_is_per_address() {
    let app = common::build_test_app();

    let response = evaluate(&app, "https://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = evaluate(&app, "https://example.com", None, "203.0.113.10:40001").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = evaluate(&app, "https://example.com", None, PEER_B).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Once the free pass is spent, a valid token keeps the endpoint open.
#[tokio::test]
async fn test_authenticated_requests_after_free_pass() {
    let app = common::build_test_app();
    let token = token_for(&app, "evaluator@example.com").await;

    let response = evaluate(&app, "https://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::OK);

    for _ in 0..3 {
        let response = evaluate(&app, "https://example.com", Some(&token), PEER_A).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = evaluate(&app, "https://example.com", Some("bogus"), PEER_A).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The report is the same placeholder regardless of target.
#[tokio::test]
async fn test_report_is_independent_of_target() {
    let app = common::build_test_app();

    let a = body_json(evaluate(&app, "https://example.com", None, PEER_A).await).await;
    let b = body_json(evaluate(&app, "https://other.org", None, PEER_B).await).await;

    assert_eq!(a["url"], "https://example.com");
    assert_eq!(b["url"], "https://other.org");
    assert_eq!(a["evaluation"]["status"], "completed");
    assert_eq!(a["evaluation"]["metrics"], b["evaluation"]["metrics"]);

    let metrics = &a["evaluation"]["metrics"];
    assert_eq!(metrics["performance"]["score"], 85);
    assert_eq!(metrics["performance"]["details"]["speedIndex"], "2.1s");
    assert_eq!(metrics["accessibility"]["score"], 92);
    assert_eq!(metrics["bestPractices"]["issues"], 3);
    assert_eq!(metrics["seo"]["score"], 95);

    let keys = |v: &Value| -> Vec<String> {
        let mut keys: Vec<String> = v["evaluation"].as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&a), keys(&b));
}

/// Non-HTTP(S) and empty URLs are rejected with a validation error.
#[tokio::test]
async fn test_invalid_urls_are_rejected() {
    let app = common::build_test_app();
    let token = token_for(&app, "validator@example.com").await;

    for (i, url) in ["ftp://example.com", "example.com", "javascript:alert(1)", ""]
        .into_iter()
        .enumerate()
    {
        let peer = format!("192.0.2.{}:5000", i + 1);
        let response = evaluate(&app, url, Some(&token), &peer).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "url: {url:?}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let response = evaluate(&app, "ftp://example.com", Some(&token), PEER_A).await;
    let json = body_json(response).await;
    assert_eq!(json["error"], "url: URL must be a valid HTTP or HTTPS URL");
}

/// The gate runs before body validation, so a rejected first request still
/// spends the free pass.
#[tokio::test]
async fn test_invalid_first_request_spends_free_pass() {
    let (app, state) = common::build_test_app_with(common::test_config());

    let response = evaluate(&app, "ftp://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.free_access.has_used("203.0.113.10".parse().unwrap()));

    let response = evaluate(&app, "https://example.com", None, PEER_A).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Responses carry a millisecond-precision UTC timestamp.
#[tokio::test]
async fn test_report_timestamp_format() {
    let app = common::build_test_app();
    let json = body_json(evaluate(&app, "https://example.com", None, PEER_A).await).await;

    let timestamp = json["evaluation"]["timestamp"].as_str().unwrap();
    assert!(timestamp.ends_with('Z'), "timestamp: {timestamp}");
    let fraction = timestamp.rsplit_once('.').unwrap().1;
    assert_eq!(fraction.len(), "123Z".len(), "timestamp: {timestamp}");
}

/// A body without `url` never reaches the handler.
#[tokio::test]
async fn test_missing_url_is_rejected() {
    let app = common::build_test_app();
    let response = send(
        &app,
        Method::POST,
        "/site/evaluate",
        Some(json!({ "website": "https://example.com" })),
        None,
        PEER_A,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Behind a trusted proxy, `X-Forwarded-For` identifies the client.
#[tokio::test]
async fn test_forwarded_for_is_used_when_trusted() {
    let mut config = common::test_config();
    config.trust_forwarded_for = true;
    let (app, state) = common::build_test_app_with(config);

    let request = |client: &'static str| {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri("/site/evaluate")
            .header("content-type", "application/json")
            .header("x-forwarded-for", client)
            .body(axum::body::Body::from(
                json!({ "url": "https://example.com" }).to_string(),
            ))
            .unwrap()
    };

    let first = app.clone().oneshot(request("203.0.113.50")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app.clone().oneshot(request("203.0.113.50")).await.unwrap();
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    let other = app.clone().oneshot(request("203.0.113.51")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);

    assert!(state.free_access.has_used("203.0.113.50".parse().unwrap()));
    assert_eq!(state.free_access.used_count(), 2);
}
