//! Runway Gen-3 text-to-video client.
//!
//! Runway returns output URLs directly on the task, so the file locator
//! is already downloadable.

use serde::{Deserialize, Serialize};
use wallmania_core::types::Orientation;

use super::{TaskPoll, TaskStatus, VideoProvider};
use crate::error::ProviderError;
use crate::http::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://api.dev.runwayml.com";
pub const DEFAULT_MODEL: &str = "gen3a_turbo";
pub const DEFAULT_DURATION_SECS: u32 = 5;
/// Value of the mandatory `X-Runway-Version` header.
pub const API_VERSION: &str = "2024-11-06";
const VERSION_HEADER: &str = "X-Runway-Version";

#[derive(Debug, Clone)]
pub struct RunwayConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub duration_secs: u32,
}

impl RunwayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Aspect ratio requested for each orientation.
pub fn ratio_for(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => "768:1280",
        Orientation::Landscape => "1280:768",
    }
}

pub fn map_status(raw: &str) -> TaskStatus {
    match raw {
        "PENDING" | "THROTTLED" => TaskStatus::Queueing,
        "RUNNING" => TaskStatus::Processing,
        "SUCCEEDED" => TaskStatus::Finished,
        "FAILED" | "CANCELLED" => TaskStatus::Fail,
        _ => TaskStatus::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    prompt_text: &'a str,
    model: &'a str,
    ratio: &'a str,
    duration: u32,
    watermark: bool,
}

#[derive(Debug, Deserialize)]
struct TaskRef {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<String>,
    task: Option<TaskRef>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Vec<String>,
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

impl TaskResponse {
    fn output_url(&self) -> Option<String> {
        self.output
            .first()
            .cloned()
            .or_else(|| self.artifacts.iter().find_map(|a| a.url.clone()))
            .filter(|u| !u.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct RunwayProvider {
    client: reqwest::Client,
    config: RunwayConfig,
}

impl RunwayProvider {
    pub fn new(client: reqwest::Client, config: RunwayConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl VideoProvider for RunwayProvider {
    fn name(&self) -> &'static str {
        "runway"
    }

    async fn submit(&self, prompt: &str, orientation: Orientation) -> Result<String, ProviderError> {
        let body = SubmitRequest {
            prompt_text: prompt,
            model: &self.config.model,
            ratio: ratio_for(orientation),
            duration: self.config.duration_secs,
            watermark: false,
        };
        let response = self
            .client
            .post(self.endpoint("/v1/text_to_video"))
            .bearer_auth(&self.config.api_key)
            .header(VERSION_HEADER, API_VERSION)
            .json(&body)
            .send()
            .await?;
        let created: SubmitResponse = parse_response(response).await?;
        created
            .id
            .or_else(|| created.task.and_then(|t| t.id))
            .filter(|id| !id.is_empty())
            .ok_or(ProviderError::MissingField("id"))
    }

    async fn query(&self, task_id: &str) -> Result<TaskPoll, ProviderError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/v1/tasks/{task_id}")))
            .bearer_auth(&self.config.api_key)
            .header(VERSION_HEADER, API_VERSION)
            .send()
            .await?;
        let task: TaskResponse = parse_response(response).await?;

        let status = task
            .status
            .as_deref()
            .map(map_status)
            .unwrap_or(TaskStatus::Unknown);
        let file_locator = match status {
            TaskStatus::Finished => task.output_url(),
            _ => None,
        };
        Ok(TaskPoll {
            status,
            file_locator,
            raw_status: task.status,
        })
    }

    async fn resolve_download_url(&self, file_locator: &str) -> Result<String, ProviderError> {
        Ok(file_locator.to_string())
    }
}
