use crate::{
    api::{health, users},
    config::Config,
    domain::Support,
    observability::request_log::log_requests,
    rate_limit::{middleware::rate_limit_middleware, RateLimiter},
    store::UserStore,
};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub rate_limiter: Arc<RateLimiter>,
    pub support: Arc<Support>,
}

impl AppState {
    /// Build the process-wide state from configuration
    pub fn new(config: &Config) -> Self {
        health::record_start_time();

        Self {
            users: Arc::new(UserStore::seeded()),
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            support: Arc::new(Support {
                url: config.api.support_url.clone(),
                text: config.api.support_text.clone(),
            }),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoint
        .route("/health", get(health::liveness))
        // API routes
        .nest("/api", api_routes())
        // Middleware: the rate limit gate wraps the logging layer, so a
        // denied request is rejected before any timing/logging happens
        .layer(middleware::from_fn(log_requests))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/avatar", get(users::get_user_avatar))
}
