//! MiniMax Hailuo text-to-video client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wallmania_core::types::Orientation;

use super::{TaskPoll, TaskStatus, VideoProvider};
use crate::error::ProviderError;
use crate::http::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://api.minimax.chat";
pub const DEFAULT_MODEL: &str = "MiniMax-Hailuo-02";
pub const DEFAULT_DURATION_SECS: u32 = 6;

/// Vendor status code meaning success in `base_resp`.
const STATUS_OK: i64 = 0;

/// Credentials and job parameters for MiniMax.
#[derive(Debug, Clone)]
pub struct MinimaxConfig {
    pub api_key: String,
    pub group_id: String,
    pub base_url: String,
    pub model: String,
    pub duration_secs: u32,
}

impl MinimaxConfig {
    pub fn new(api_key: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            group_id: group_id.into(),
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

/// Output resolution requested for each orientation.
pub fn resolution_for(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => "720P",
        Orientation::Landscape => "1080P",
    }
}

/// Map a MiniMax status string onto [`TaskStatus`].
pub fn map_status(raw: &str) -> TaskStatus {
    match raw {
        "Preparing" => TaskStatus::Preparing,
        "Queueing" => TaskStatus::Queueing,
        "Processing" => TaskStatus::Processing,
        "Success" => TaskStatus::Finished,
        "Fail" => TaskStatus::Fail,
        _ => TaskStatus::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    duration: u32,
    resolution: &'a str,
}

#[derive(Debug, Deserialize)]
struct BaseResp {
    #[serde(default)]
    status_code: i64,
    #[serde(default)]
    status_msg: String,
}

/// Response envelope. Payload fields appear either at the top level or
/// under `data`, depending on API version.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    base_resp: Option<BaseResp>,
    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

impl Envelope {
    fn check(&self) -> Result<(), ProviderError> {
        match &self.base_resp {
            Some(resp) if resp.status_code != STATUS_OK => Err(ProviderError::Rejected {
                code: resp.status_code,
                message: if resp.status_msg.is_empty() {
                    "Unknown error".to_string()
                } else {
                    resp.status_msg.clone()
                },
            }),
            _ => Ok(()),
        }
    }

    /// Look up a string field at the top level, then under `data`.
    fn string(&self, name: &str) -> Option<String> {
        let top = self.fields.get(name);
        let nested = self.fields.get("data").and_then(|d| d.get(name));
        top.into_iter()
            .chain(nested)
            .find_map(value_as_string)
            .filter(|s| !s.is_empty())
    }
}

/// Ids are documented as strings but have been observed as numbers.
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct MinimaxProvider {
    client: reqwest::Client,
    config: MinimaxConfig,
}

impl MinimaxProvider {
    pub fn new(client: reqwest::Client, config: MinimaxConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl VideoProvider for MinimaxProvider {
    fn name(&self) -> &'static str {
        "minimax"
    }

    async fn submit(&self, prompt: &str, orientation: Orientation) -> Result<String, ProviderError> {
        let body = SubmitRequest {
            prompt,
            model: &self.config.model,
            duration: self.config.duration_secs,
            resolution: resolution_for(orientation),
        };
        let response = self
            .client
            .post(self.endpoint("/v1/video_generation"))
            .query(&[("GroupId", self.config.group_id.as_str())])
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let envelope: Envelope = parse_response(response).await?;
        envelope.check()?;
        envelope
            .string("task_id")
            .ok_or(ProviderError::MissingField("task_id"))
    }

    async fn query(&self, task_id: &str) -> Result<TaskPoll, ProviderError> {
        let response = self
            .client
            .get(self.endpoint("/v1/query/video_generation"))
            .query(&[("task_id", task_id), ("GroupId", self.config.group_id.as_str())])
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        let envelope: Envelope = parse_response(response).await?;
        envelope.check()?;

        let raw_status = envelope.string("status");
        let status = raw_status
            .as_deref()
            .map(map_status)
            .unwrap_or(TaskStatus::Unknown);
        let file_locator = match status {
            TaskStatus::Finished => envelope.string("file_id"),
            _ => None,
        };
        Ok(TaskPoll {
            status,
            file_locator,
            raw_status,
        })
    }

    async fn resolve_download_url(&self, file_id: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(self.endpoint("/v1/files/retrieve"))
            .query(&[("file_id", file_id), ("GroupId", self.config.group_id.as_str())])
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        let envelope: Envelope = parse_response(response).await?;
        envelope.check()?;

        let file = envelope
            .fields
            .get("file")
            .or_else(|| envelope.fields.get("data").and_then(|d| d.get("file")));
        file.and_then(|f| f.get("download_url"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(ProviderError::MissingField("file.download_url"))
    }
}
