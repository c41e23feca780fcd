use crate::api::routes::AppState;
use crate::errors::AppError;
use crate::rate_limit::limiter::RateLimitResult;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

/// Rate limiting middleware.
///
/// Sits outermost on the router: a denied request is answered with 429
/// immediately and the downstream handler chain (including the request
/// logging layer) is never invoked.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_id = extract_client_id(request.headers(), peer);

    let result = state.rate_limiter.check(&client_id, Instant::now());

    if !result.decision.is_allow() {
        // A normal outcome, not an application error
        tracing::warn!(
            client_id = %client_id,
            limit = %result.limit,
            current = %result.current,
            "Rate limit exceeded"
        );

        return Err(AppError::RateLimitExceeded);
    }

    let mut response = next.run(request).await;
    add_rate_limit_headers(response.headers_mut(), &result);

    Ok(response)
}

/// Extract the client identity used to partition rate limit state.
///
/// Proxy headers win over the raw peer address so that clients behind a
/// reverse proxy are not all collapsed onto the proxy's IP. Collisions
/// behind shared NAT are an accepted limitation.
fn extract_client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(ip) = forwarded_for.to_str() {
            return format!("ip:{}", ip.split(',').next().unwrap_or("unknown").trim());
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip) = real_ip.to_str() {
            return format!("ip:{}", ip);
        }
    }

    if let Some(peer) = peer {
        return format!("ip:{}", peer.ip());
    }

    "ip:unknown".to_string()
}

/// Add rate limit headers to an allowed response
fn add_rate_limit_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    use axum::http::header::HeaderName;
    use axum::http::HeaderValue;

    if let Ok(value) = HeaderValue::from_str(&result.limit.to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-limit"), value);
    }

    if let Ok(value) = HeaderValue::from_str(&result.remaining.to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-remaining"), value);
    }
}
