use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Request logging middleware.
///
/// Wraps every request that passed the rate limit gate with a monotonic
/// timer and emits one structured log line per completed request with the
/// method, path, status and elapsed seconds.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    tracing::info!(method = %method, path = %path, "Request received");

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        elapsed_seconds = %format!("{:.3}", elapsed),
        "Request completed"
    );

    response
}
