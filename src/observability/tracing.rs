use crate::config::ObservabilityConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// RUST_LOG takes precedence over the configured level. Output is
/// flattened JSON when the config asks for it, a compact human-readable
/// format otherwise.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let base = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        base.with(fmt::layer().json().flatten_event(true)).init();
    } else {
        base.with(fmt::layer().compact()).init();
    }
}
