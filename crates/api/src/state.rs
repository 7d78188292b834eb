use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wallmania_providers::video::minimax::MinimaxProvider;
use wallmania_providers::video::runway::RunwayProvider;
use wallmania_providers::video::VideoProvider;

use crate::config::{ProviderConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or is a handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// `None` when the configured vendor has no credentials.
    pub video: Option<Arc<dyn VideoProvider>>,
    /// Cancelled on shutdown so in-flight polls stop early.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: ServerConfig, http: reqwest::Client, shutdown: CancellationToken) -> Self {
        let video = build_provider(&config.provider, http);
        if video.is_none() {
            tracing::warn!(
                provider = config.provider.name(),
                "Video provider credentials missing; generation requests will fail",
            );
        }
        Self {
            config: Arc::new(config),
            video,
            shutdown,
        }
    }
}

/// Instantiate the configured vendor client, if it has credentials.
pub fn build_provider(
    config: &ProviderConfig,
    http: reqwest::Client,
) -> Option<Arc<dyn VideoProvider>> {
    match config {
        ProviderConfig::Minimax(Some(c)) => Some(Arc::new(MinimaxProvider::new(http, c.clone()))),
        ProviderConfig::Runway(Some(c)) => Some(Arc::new(RunwayProvider::new(http, c.clone()))),
        ProviderConfig::Minimax(None) | ProviderConfig::Runway(None) => None,
    }
}
