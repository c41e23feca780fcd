use crate::errors::{AppError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests a single client may make within one window
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u64,
    /// Length of the trailing window in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: default_requests_per_window(),
            window_seconds: default_window_seconds(),
        }
    }
}

fn default_requests_per_window() -> u64 {
    60
}

fn default_window_seconds() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_support_url")]
    pub support_url: String,
    #[serde(default = "default_support_text")]
    pub support_text: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            support_url: default_support_url(),
            support_text: default_support_text(),
        }
    }
}

fn default_support_url() -> String {
    "https://contentcaddy.io".to_string()
}

fn default_support_text() -> String {
    "Tired of writing endless social media content? Let Content Caddy generate it for you."
        .to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        // Determine environment
        let environment =
            env::var("USER_DIRECTORY_ENV").unwrap_or_else(|_| "development".to_string());

        // Build configuration; every key has a serde default, so the
        // service starts with no config files present at all
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            // Environment variables with prefix USER_DIRECTORY
            // e.g., USER_DIRECTORY__SERVER__PORT=8000
            .add_source(
                config::Environment::with_prefix("USER_DIRECTORY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        // Deserialize into our Config struct
        config
            .try_deserialize()
            .map_err(|e| AppError::Configuration(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration("Invalid port number".to_string()));
        }

        // A zero-length window would make every recorded request
        // immediately stale; requests_per_window = 0 is legal (always deny)
        if self.rate_limit.window_seconds == 0 {
            return Err(AppError::Configuration(
                "Rate limit window must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config {
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            api: ApiConfig::default(),
            observability: ObservabilityConfig::default(),
        };

        assert_eq!(config.rate_limit.requests_per_window, 60);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config {
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            api: ApiConfig::default(),
            observability: ObservabilityConfig::default(),
        };

        config.rate_limit.window_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limit_allowed() {
        let mut config = Config {
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            api: ApiConfig::default(),
            observability: ObservabilityConfig::default(),
        };

        // Always-deny is a valid configuration
        config.rate_limit.requests_per_window = 0;
        assert!(config.validate().is_ok());
    }
}
