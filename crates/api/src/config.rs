use std::time::Duration;

use wallmania_providers::video::minimax::{self, MinimaxConfig};
use wallmania_providers::video::runway::{self, RunwayConfig};
use wallmania_providers::video::poll::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use wallmania_providers::video::PollConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `900`). Must outlast a
    /// full video poll.
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Vendor the relay talks to.
    pub provider: ProviderConfig,
    pub poll: PollConfig,
}

/// Which video vendor to use, with its credentials.
///
/// `None` inside a variant means the key is missing: the server still
/// starts, and generation requests answer 500.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Minimax(Option<MinimaxConfig>),
    Runway(Option<RunwayConfig>),
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::Minimax(_) => "minimax",
            ProviderConfig::Runway(_) => "runway",
        }
    }

    /// Load from the environment.
    ///
    /// | Env Var            | Default                        |
    /// |--------------------|--------------------------------|
    /// | `VIDEO_BACKEND`    | `minimax` (`minimax`, `runway`) |
    /// | `MINIMAX_API_KEY`  | (none)                         |
    /// | `MINIMAX_GROUP_ID` | (none)                         |
    /// | `MINIMAX_BASE_URL` | `https://api.minimax.chat`     |
    /// | `RUNWAY_API_KEY`   | (none)                         |
    /// | `RUNWAY_BASE_URL`  | `https://api.dev.runwayml.com` |
    pub fn from_env() -> Self {
        let backend = std::env::var("VIDEO_BACKEND").unwrap_or_else(|_| "minimax".into());

        match backend.trim().to_ascii_lowercase().as_str() {
            "minimax" => {
                let config = match (non_empty_var("MINIMAX_API_KEY"), non_empty_var("MINIMAX_GROUP_ID")) {
                    (Some(key), Some(group)) => Some(
                        MinimaxConfig::new(key, group).with_base_url(
                            non_empty_var("MINIMAX_BASE_URL")
                                .unwrap_or_else(|| minimax::DEFAULT_BASE_URL.into()),
                        ),
                    ),
                    _ => None,
                };
                ProviderConfig::Minimax(config)
            }
            "runway" => {
                let config = non_empty_var("RUNWAY_API_KEY").map(|key| {
                    RunwayConfig::new(key).with_base_url(
                        non_empty_var("RUNWAY_BASE_URL")
                            .unwrap_or_else(|| runway::DEFAULT_BASE_URL.into()),
                    )
                });
                ProviderConfig::Runway(config)
            }
            other => panic!("VIDEO_BACKEND must be 'minimax' or 'runway', got '{other}'"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `900`                   |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                    |
    /// | `VIDEO_POLL_INTERVAL_SECS` | `10`                    |
    /// | `VIDEO_POLL_MAX_ATTEMPTS`  | `60`                    |
    ///
    /// Provider variables are listed on [`ProviderConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            provider: ProviderConfig::from_env(),
            poll: poll_config_from_env(),
        }
    }
}

/// Poll cadence from `VIDEO_POLL_INTERVAL_SECS` / `VIDEO_POLL_MAX_ATTEMPTS`.
pub fn poll_config_from_env() -> PollConfig {
    let interval_secs: u64 = std::env::var("VIDEO_POLL_INTERVAL_SECS")
        .map(|v| v.parse().expect("VIDEO_POLL_INTERVAL_SECS must be a valid u64"))
        .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs());
    let max_attempts: u32 = std::env::var("VIDEO_POLL_MAX_ATTEMPTS")
        .map(|v| v.parse().expect("VIDEO_POLL_MAX_ATTEMPTS must be a valid u32"))
        .unwrap_or(DEFAULT_MAX_ATTEMPTS);

    PollConfig {
        interval: Duration::from_secs(interval_secs),
        max_attempts,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
