#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wallmania_api::config::{ProviderConfig, ServerConfig};
use wallmania_api::router::build_app_router;
use wallmania_api::state::AppState;
use wallmania_core::types::Orientation;
use wallmania_providers::video::{PollConfig, TaskPoll, TaskStatus, VideoProvider};
use wallmania_providers::ProviderError;

/// Build a test `ServerConfig` with fast polling.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        provider: ProviderConfig::Minimax(None),
        poll: PollConfig {
            interval: Duration::from_millis(1),
            max_attempts: 3,
        },
    }
}

/// Build the full router (same middleware as production) around
/// `provider`.
pub fn build_test_app(provider: Option<Arc<dyn VideoProvider>>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        video: provider,
        shutdown: CancellationToken::new(),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fake vendor
// ---------------------------------------------------------------------------

/// What the fake vendor does on `submit`.
pub enum SubmitBehaviour {
    Accept,
    HttpError(u16, &'static str),
}

/// Vendor double replaying a status script; the last entry repeats.
pub struct FakeVendor {
    submit: SubmitBehaviour,
    script: Mutex<VecDeque<TaskPoll>>,
    last: TaskPoll,
    pub queries: AtomicU32,
    pub last_orientation: Mutex<Option<Orientation>>,
}

impl FakeVendor {
    pub fn new(submit: SubmitBehaviour, script: Vec<TaskPoll>) -> Arc<Self> {
        let last = script.last().cloned().unwrap_or_else(|| poll(TaskStatus::Processing));
        Arc::new(Self {
            submit,
            script: Mutex::new(script.into()),
            last,
            queries: AtomicU32::new(0),
            last_orientation: Mutex::new(None),
        })
    }

    pub fn query_count(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

pub fn poll(status: TaskStatus) -> TaskPoll {
    TaskPoll {
        status,
        file_locator: None,
        raw_status: Some(status.to_string()),
    }
}

pub fn finished(locator: &str) -> TaskPoll {
    TaskPoll {
        status: TaskStatus::Finished,
        file_locator: Some(locator.to_string()),
        raw_status: Some("Success".to_string()),
    }
}

#[async_trait::async_trait]
impl VideoProvider for FakeVendor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn submit(&self, _: &str, orientation: Orientation) -> Result<String, ProviderError> {
        *self.last_orientation.lock().unwrap() = Some(orientation);
        match self.submit {
            SubmitBehaviour::Accept => Ok("task-9".to_string()),
            SubmitBehaviour::HttpError(status, body) => Err(ProviderError::Api {
                status,
                body: body.to_string(),
            }),
        }
    }

    async fn query(&self, _: &str) -> Result<TaskPoll, ProviderError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.last.clone()))
    }

    async fn resolve_download_url(&self, locator: &str) -> Result<String, ProviderError> {
        Ok(format!("https://cdn.example.test/{locator}.mp4"))
    }
}
