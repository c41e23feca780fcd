//! Integration tests for the rate limiting middleware over the full router.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use user_directory::{
    api::{create_router, AppState},
    config::Config,
};

fn limited_app(requests_per_window: u64) -> Router {
    let mut config: Config = serde_json::from_value(json!({})).expect("default config");
    config.rate_limit.requests_per_window = requests_per_window;

    create_router(AppState::new(&config))
}

fn request_from(client_ip: &str, uri: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .uri(uri)
        .header("x-forwarded-for", client_ip)
        .body(Body::empty())?)
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_requests_over_limit_are_rejected() -> Result<()> {
    let app = limited_app(2);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request_from("203.0.113.1", "/health")?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(request_from("203.0.113.1", "/health")?)
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = body_json(response).await?;
    assert_eq!(body["error"], "Rate limit exceeded. Please try again later.");
    assert_eq!(body["status"], 429);

    Ok(())
}

#[tokio::test]
async fn test_limit_applies_to_handlers_too() -> Result<()> {
    let app = limited_app(1);

    let response = app
        .clone()
        .oneshot(request_from("203.0.113.1", "/api/users/2")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request_from("203.0.113.1", "/api/users/2")?)
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    Ok(())
}

#[tokio::test]
async fn test_other_clients_unaffected() -> Result<()> {
    let app = limited_app(1);

    let response = app
        .clone()
        .oneshot(request_from("203.0.113.1", "/health")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request_from("203.0.113.1", "/health")?)
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client identity gets its own window
    let response = app
        .oneshot(request_from("203.0.113.2", "/health")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_rate_limit_headers_on_allowed_responses() -> Result<()> {
    let app = limited_app(5);

    let response = app
        .oneshot(request_from("203.0.113.1", "/health")?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-ratelimit-limit"], "5");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "4");

    Ok(())
}

#[tokio::test]
async fn test_zero_limit_denies_every_request() -> Result<()> {
    let app = limited_app(0);

    for client in ["203.0.113.1", "203.0.113.2"] {
        let response = app.clone().oneshot(request_from(client, "/health")?).await?;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(())
}
