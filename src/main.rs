use std::net::SocketAddr;
use std::time::{Duration, Instant};
use user_directory::{
    api::{create_router, AppState},
    config::Config,
    errors::AppError,
    observability::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Initialize tracing/logging
    init_tracing(&config.observability);

    tracing::info!("Starting user directory service");
    tracing::info!(
        "Logging initialized (level: {}, format: {})",
        config.observability.log_level,
        config.observability.log_format
    );
    tracing::info!(
        "Rate limit: {} requests per {}s window",
        config.rate_limit.requests_per_window,
        config.rate_limit.window_seconds
    );

    // Build process-wide state: the seeded directory and one shared limiter
    let state = AppState::new(&config);

    // Background sweep: per-client pruning already happens on every record,
    // this bounds retained state for clients that stop sending entirely
    let sweeper = state.rate_limiter.clone();
    let sweep_interval = Duration::from_secs(config.rate_limit.window_seconds);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            sweeper.prune(Instant::now());
            tracing::debug!(
                tracked_clients = sweeper.tracked_clients(),
                "Rate limit store pruned"
            );
        }
    });

    // Create router
    let app = create_router(state);

    // Bind server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid listen address: {}", e)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    // ConnectInfo gives the rate limiter its fallback client identity
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
