//! Text-to-video generation.
//!
//! A video job moves through `Submitted → {Preparing, Queueing,
//! Processing} → {Finished, Fail, Unknown}`. [`VideoProvider`] is the
//! per-vendor seam (submit, query, resolve); [`poll`] drives the status
//! loop; [`VideoClient`] strings the phases together, or delegates the
//! whole job to the relay.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use wallmania_core::codec::sniff_mime;
use wallmania_core::types::Orientation;

use crate::error::ProviderError;
use crate::http::download;

pub mod minimax;
pub mod poll;
pub mod relay;
pub mod runway;

pub use poll::{poll_until_terminal, PollConfig};
pub use relay::RelayClient;

/// MIME type assumed for downloaded videos the server did not label.
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

// ---------------------------------------------------------------------------
// Task state
// ---------------------------------------------------------------------------

/// Lifecycle state of a provider-side generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    Submitted,
    Preparing,
    Queueing,
    Processing,
    Finished,
    Fail,
    Unknown,
}

impl TaskStatus {
    /// `true` while the job is still running and should be polled again.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            TaskStatus::Submitted
                | TaskStatus::Preparing
                | TaskStatus::Queueing
                | TaskStatus::Processing
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Submitted => "Submitted",
            TaskStatus::Preparing => "Preparing",
            TaskStatus::Queueing => "Queueing",
            TaskStatus::Processing => "Processing",
            TaskStatus::Finished => "Finished",
            TaskStatus::Fail => "Fail",
            TaskStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ephemeral bookkeeping for one in-flight job. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTask {
    pub task_id: String,
    pub status: TaskStatus,
    pub poll_attempt: u32,
}

impl GenerationTask {
    pub fn submitted(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Submitted,
            poll_attempt: 0,
        }
    }
}

/// One status query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPoll {
    pub status: TaskStatus,
    /// Provider file id or output URL, present once finished.
    pub file_locator: Option<String>,
    /// Status string exactly as the provider sent it.
    pub raw_status: Option<String>,
}

/// A downloaded video held in memory.
#[derive(Debug, Clone)]
pub struct VideoAsset {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Signed URL the bytes were fetched from.
    pub source_url: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Terminal failures of a video generation.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider reported `Fail`, or a status we do not understand.
    #[error("Video generation failed with status: {status}")]
    GenerationFailed {
        status: TaskStatus,
        /// Raw provider status string, when available.
        detail: Option<String>,
    },

    /// The poll cap was reached without a terminal status.
    #[error("Video generation timeout - exceeded {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The caller cancelled the poll.
    #[error("Video generation cancelled")]
    Cancelled,

    /// The relay endpoint answered with `{ error, details }`.
    #[error("Relay error: {error}")]
    Relay {
        error: String,
        details: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// A text-to-video vendor exposing an asynchronous job API.
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Submit a job and return the provider task id.
    async fn submit(&self, prompt: &str, orientation: Orientation) -> Result<String, ProviderError>;

    /// Query the current status of `task_id`.
    async fn query(&self, task_id: &str) -> Result<TaskPoll, ProviderError>;

    /// Turn a finished job's file locator into a downloadable URL.
    async fn resolve_download_url(&self, file_locator: &str) -> Result<String, ProviderError>;
}

/// Submit a job through `provider`.
pub async fn submit(
    provider: &dyn VideoProvider,
    prompt: &str,
    orientation: Orientation,
) -> Result<GenerationTask, VideoError> {
    let task_id = provider.submit(prompt, orientation).await?;
    if task_id.trim().is_empty() {
        return Err(ProviderError::MissingField("task_id").into());
    }
    tracing::info!(
        provider = provider.name(),
        task_id = %task_id,
        orientation = %orientation,
        "Video generation task submitted",
    );
    Ok(GenerationTask::submitted(task_id))
}

/// Resolve `file_locator` and download the video into memory.
pub async fn fetch_result(
    provider: &dyn VideoProvider,
    client: &reqwest::Client,
    file_locator: &str,
) -> Result<VideoAsset, VideoError> {
    let url = provider.resolve_download_url(file_locator).await?;
    tracing::info!(provider = provider.name(), "Downloading generated video");
    download_video(client, &url).await
}

async fn download_video(client: &reqwest::Client, url: &str) -> Result<VideoAsset, VideoError> {
    let body = download(client, url).await?;
    let mime_type = body
        .content_type
        .filter(|ct| ct.starts_with("video/"))
        .or_else(|| sniff_mime(&body.bytes).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string());
    Ok(VideoAsset {
        bytes: body.bytes,
        mime_type,
        source_url: url.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Where video jobs are executed.
#[derive(Clone)]
pub enum VideoBackend {
    /// Talk to the vendor directly (credential held by this process).
    Direct(Arc<dyn VideoProvider>),
    /// Delegate the whole job to the relay endpoint.
    Relay(RelayClient),
}

/// End-to-end video generation.
#[derive(Clone)]
pub struct VideoClient {
    http: reqwest::Client,
    backend: VideoBackend,
    poll: PollConfig,
}

impl VideoClient {
    pub fn new(http: reqwest::Client, backend: VideoBackend, poll: PollConfig) -> Self {
        Self {
            http,
            backend,
            poll,
        }
    }

    pub fn backend(&self) -> &VideoBackend {
        &self.backend
    }

    /// Run a job to completion and return a downloadable URL.
    ///
    /// Direct backends submit, poll, then resolve the file locator, in
    /// that order. The relay performs all three server-side.
    pub async fn generate_url(
        &self,
        prompt: &str,
        orientation: Orientation,
        cancel: &CancellationToken,
    ) -> Result<String, VideoError> {
        match &self.backend {
            VideoBackend::Direct(provider) => {
                let locator = self.run_direct(provider.as_ref(), prompt, orientation, cancel).await?;
                Ok(provider.resolve_download_url(&locator).await?)
            }
            VideoBackend::Relay(relay) => self.run_relay(relay, prompt, orientation, cancel).await,
        }
    }

    /// Run a job to completion and download the result into memory.
    pub async fn generate(
        &self,
        prompt: &str,
        orientation: Orientation,
        cancel: &CancellationToken,
    ) -> Result<VideoAsset, VideoError> {
        match &self.backend {
            VideoBackend::Direct(provider) => {
                let locator = self.run_direct(provider.as_ref(), prompt, orientation, cancel).await?;
                fetch_result(provider.as_ref(), &self.http, &locator).await
            }
            VideoBackend::Relay(relay) => {
                let url = self.run_relay(relay, prompt, orientation, cancel).await?;
                tracing::info!("Relay video generation finished, downloading result");
                download_video(&self.http, &url).await
            }
        }
    }

    /// Submit and poll; returns the provider's file locator.
    async fn run_direct(
        &self,
        provider: &dyn VideoProvider,
        prompt: &str,
        orientation: Orientation,
        cancel: &CancellationToken,
    ) -> Result<String, VideoError> {
        let mut task = submit(provider, prompt, orientation).await?;
        poll_until_terminal(provider, &mut task, &self.poll, cancel).await
    }

    async fn run_relay(
        &self,
        relay: &RelayClient,
        prompt: &str,
        orientation: Orientation,
        cancel: &CancellationToken,
    ) -> Result<String, VideoError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(VideoError::Cancelled),
            result = relay.generate(prompt, orientation) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_statuses_keep_polling() {
        for s in [
            TaskStatus::Submitted,
            TaskStatus::Preparing,
            TaskStatus::Queueing,
            TaskStatus::Processing,
        ] {
            assert!(s.is_active(), "{s} should be active");
        }
        for s in [TaskStatus::Finished, TaskStatus::Fail, TaskStatus::Unknown] {
            assert!(!s.is_active(), "{s} should be terminal");
        }
    }

    struct BlankIdProvider;

    #[async_trait::async_trait]
    impl VideoProvider for BlankIdProvider {
        fn name(&self) -> &'static str {
            "blank"
        }

        async fn submit(&self, _: &str, _: Orientation) -> Result<String, ProviderError> {
            Ok("  ".to_string())
        }

        async fn query(&self, _: &str) -> Result<TaskPoll, ProviderError> {
            unreachable!("no query after a failed submit")
        }

        async fn resolve_download_url(&self, _: &str) -> Result<String, ProviderError> {
            unreachable!("no resolve after a failed submit")
        }
    }

    #[tokio::test]
    async fn blank_task_id_is_missing_field() {
        let err = submit(&BlankIdProvider, "waves", Orientation::Portrait)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VideoError::Provider(ProviderError::MissingField("task_id"))
        ));
    }

    #[test]
    fn new_task_starts_submitted() {
        let task = GenerationTask::submitted("t-1");
        assert_eq!(task.status, TaskStatus::Submitted);
        assert_eq!(task.poll_attempt, 0);
    }

    #[test]
    fn failure_message_names_status() {
        let err = VideoError::GenerationFailed {
            status: TaskStatus::Fail,
            detail: None,
        };
        assert_eq!(err.to_string(), "Video generation failed with status: Fail");
    }
}
