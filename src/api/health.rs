use axum::{response::IntoResponse, Json};
use once_cell::sync::Lazy;
use serde_json::json;
use std::time::Instant;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Pin the process start time; called once while the state is built so
/// uptime is not measured from the first probe
pub fn record_start_time() {
    Lazy::force(&START_TIME);
}

/// GET /health - liveness probe
pub async fn liveness() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}
