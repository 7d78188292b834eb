//! Environment configuration for the `wallmania` binary.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use wallmania_core::quota::{
    QuotaLimits, DEFAULT_DAILY_DOWNLOAD_LIMIT, DEFAULT_DAILY_TOKEN_LIMIT, DEFAULT_TOKENS_PER_IMAGE,
};
use wallmania_core::types::Platform;
use wallmania_providers::image::{ImageProviderConfig, DEFAULT_FALLBACK_URL, DEFAULT_PRIMARY_URL};
use wallmania_providers::video::minimax::{self, MinimaxConfig};
use wallmania_providers::video::poll::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use wallmania_providers::video::runway::{self, RunwayConfig};
use wallmania_providers::video::PollConfig;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://wallmania.db";
pub const DEFAULT_APP_URL: &str = "https://wallmania.app";

/// Where video generation runs.
#[derive(Debug, Clone)]
pub enum VideoSettings {
    /// Talk to MiniMax directly.
    Minimax(MinimaxConfig),
    /// Talk to Runway directly.
    Runway(RunwayConfig),
    /// Delegate the whole job to a relay endpoint.
    Relay { url: String },
    /// The selected backend has no credentials or URL.
    Unconfigured { backend: &'static str },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub media_dir: PathBuf,
    pub download_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub platform: Platform,
    pub app_url: String,
    pub limits: QuotaLimits,
    pub images: ImageProviderConfig,
    pub video: VideoSettings,
    pub poll: PollConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                        |
    /// |----------------------------|--------------------------------|
    /// | `DATABASE_URL`             | `sqlite://wallmania.db`        |
    /// | `MEDIA_DIR`                | `media`                        |
    /// | `DOWNLOAD_DIR`             | `downloads`                    |
    /// | `CACHE_DIR`                | `cache`                        |
    /// | `PLATFORM`                 | `desktop`                      |
    /// | `APP_URL`                  | `https://wallmania.app`        |
    /// | `DAILY_TOKEN_LIMIT`        | `500`                          |
    /// | `TOKENS_PER_IMAGE`         | `50`                           |
    /// | `DAILY_DOWNLOAD_LIMIT`     | `5`                            |
    /// | `IMAGE_PRIMARY_URL`        | `https://image.pollinations.ai` |
    /// | `IMAGE_FALLBACK_URL`       | `https://picsum.photos`        |
    /// | `VIDEO_BACKEND`            | `minimax` (`minimax`, `runway`, `relay`) |
    /// | `MINIMAX_API_KEY`          | (none)                         |
    /// | `MINIMAX_GROUP_ID`         | (none)                         |
    /// | `MINIMAX_BASE_URL`         | `https://api.minimax.chat`     |
    /// | `RUNWAY_API_KEY`           | (none)                         |
    /// | `RUNWAY_BASE_URL`          | `https://api.dev.runwayml.com` |
    /// | `RELAY_URL`                | (none)                         |
    /// | `VIDEO_POLL_INTERVAL_SECS` | `10`                           |
    /// | `VIDEO_POLL_MAX_ATTEMPTS`  | `60`                           |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let limits = QuotaLimits {
            daily_tokens: parse_or(&var, "DAILY_TOKEN_LIMIT", DEFAULT_DAILY_TOKEN_LIMIT)?,
            tokens_per_image: parse_or(&var, "TOKENS_PER_IMAGE", DEFAULT_TOKENS_PER_IMAGE)?,
            daily_downloads: parse_or(&var, "DAILY_DOWNLOAD_LIMIT", DEFAULT_DAILY_DOWNLOAD_LIMIT)?,
        };

        let images = ImageProviderConfig {
            primary_base_url: var("IMAGE_PRIMARY_URL").unwrap_or_else(|| DEFAULT_PRIMARY_URL.into()),
            fallback_base_url: var("IMAGE_FALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_FALLBACK_URL.into()),
            ..ImageProviderConfig::default()
        };

        let poll = PollConfig {
            interval: Duration::from_secs(parse_or(
                &var,
                "VIDEO_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL.as_secs(),
            )?),
            max_attempts: parse_or(&var, "VIDEO_POLL_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
        };

        let platform = match var("PLATFORM") {
            Some(raw) => parse_platform(&raw)?,
            None => Platform::Desktop,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            media_dir: var("MEDIA_DIR").unwrap_or_else(|| "media".into()).into(),
            download_dir: var("DOWNLOAD_DIR").unwrap_or_else(|| "downloads".into()).into(),
            cache_dir: var("CACHE_DIR").unwrap_or_else(|| "cache".into()).into(),
            platform,
            app_url: var("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.into()),
            limits,
            images,
            video: video_settings(&var)?,
            poll,
        })
    }
}

fn video_settings(var: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<VideoSettings> {
    let backend = var("VIDEO_BACKEND").unwrap_or_else(|| "minimax".into());

    let settings = match backend.to_ascii_lowercase().as_str() {
        "minimax" => match (var("MINIMAX_API_KEY"), var("MINIMAX_GROUP_ID")) {
            (Some(key), Some(group)) => VideoSettings::Minimax(
                MinimaxConfig::new(key, group).with_base_url(
                    var("MINIMAX_BASE_URL").unwrap_or_else(|| minimax::DEFAULT_BASE_URL.into()),
                ),
            ),
            _ => VideoSettings::Unconfigured { backend: "minimax" },
        },
        "runway" => match var("RUNWAY_API_KEY") {
            Some(key) => VideoSettings::Runway(RunwayConfig::new(key).with_base_url(
                var("RUNWAY_BASE_URL").unwrap_or_else(|| runway::DEFAULT_BASE_URL.into()),
            )),
            None => VideoSettings::Unconfigured { backend: "runway" },
        },
        "relay" => match var("RELAY_URL") {
            Some(url) => VideoSettings::Relay { url },
            None => VideoSettings::Unconfigured { backend: "relay" },
        },
        other => bail!("VIDEO_BACKEND must be 'minimax', 'runway', or 'relay', got '{other}'"),
    };
    Ok(settings)
}

fn parse_or<T>(var: &dyn Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_platform(raw: &str) -> anyhow::Result<Platform> {
    match raw.to_ascii_lowercase().as_str() {
        "web" => Ok(Platform::Web),
        "android" => Ok(Platform::Android),
        "ios" => Ok(Platform::Ios),
        "desktop" => Ok(Platform::Desktop),
        other => bail!("PLATFORM must be one of web, android, ios, desktop, got '{other}'"),
    }
}
