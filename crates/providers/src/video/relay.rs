//! Client for the same-origin video relay (`wallmania-api`).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wallmania_core::types::Orientation;

use super::{PollConfig, VideoError};
use crate::error::ProviderError;

/// Headroom over the relay's poll budget for submit, resolve, and transit.
const RELAY_TIMEOUT_SLACK: Duration = Duration::from_secs(60);

/// Body of `POST /functions/v1/generate-video`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub prompt: String,
    pub orientation: Orientation,
}

/// Success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySuccess {
    pub video_url: String,
}

/// Failure body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Client for the relay endpoint.
///
/// A relay request stays open for the whole server-side job, so it
/// carries its own timeout, sized from the poll budget, in place of the
/// shared client's.
#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: PollConfig::default().budget() + RELAY_TIMEOUT_SLACK,
        }
    }

    /// Size the request timeout for a relay polling with `poll`.
    pub fn with_poll_budget(mut self, poll: &PollConfig) -> Self {
        self.timeout = poll.budget() + RELAY_TIMEOUT_SLACK;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the relay to run a full job; returns the video URL.
    pub async fn generate(
        &self,
        prompt: &str,
        orientation: Orientation,
    ) -> Result<String, VideoError> {
        let body = RelayRequest {
            prompt: prompt.to_string(),
            orientation,
        };
        tracing::info!(relay = %self.url, orientation = %orientation, "Requesting video from relay");

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ProviderError::from)?;

        if status.is_success() {
            let ok: RelaySuccess = serde_json::from_str(&text)
                .map_err(|_| ProviderError::MissingField("videoUrl"))?;
            if ok.video_url.is_empty() {
                return Err(ProviderError::MissingField("videoUrl").into());
            }
            return Ok(ok.video_url);
        }

        match serde_json::from_str::<RelayFailure>(&text) {
            Ok(failure) => {
                tracing::warn!(
                    status = status.as_u16(),
                    error = %failure.error,
                    "Relay reported failure",
                );
                Err(VideoError::Relay {
                    error: failure.error,
                    details: failure.details,
                })
            }
            Err(_) => Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            }
            .into()),
        }
    }
}
