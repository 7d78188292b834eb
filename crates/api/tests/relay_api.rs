//! HTTP contract of the video relay.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, finished, get, poll, post_json, FakeVendor, SubmitBehaviour};
use serde_json::json;
use tower::ServiceExt;
use wallmania_core::types::Orientation;
use wallmania_providers::video::{TaskStatus, VideoProvider};

const GENERATE: &str = "/functions/v1/generate-video";

fn app_with(vendor: &Arc<FakeVendor>) -> axum::Router {
    let provider: Arc<dyn VideoProvider> = vendor.clone();
    common::build_test_app(Some(provider))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_with_provider() {
    let vendor = FakeVendor::new(SubmitBehaviour::Accept, vec![]);
    let response = get(app_with(&vendor), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_some());
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_is_degraded_without_credentials() {
    let response = get(common::build_test_app(None), "/health").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
}

// ---------------------------------------------------------------------------
// Generate video
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_job_returns_video_url() {
    let vendor = FakeVendor::new(
        SubmitBehaviour::Accept,
        vec![
            poll(TaskStatus::Queueing),
            poll(TaskStatus::Processing),
            finished("clip"),
        ],
    );

    let response = post_json(
        app_with(&vendor),
        GENERATE,
        json!({"prompt": "northern lights", "orientation": "portrait"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["videoUrl"], "https://cdn.example.test/clip.mp4");
    assert_eq!(vendor.query_count(), 3);
    assert_eq!(*vendor.last_orientation.lock().unwrap(), Some(Orientation::Portrait));
}

#[tokio::test]
async fn blank_prompt_is_rejected() {
    let vendor = FakeVendor::new(SubmitBehaviour::Accept, vec![finished("x")]);

    let response = post_json(
        app_with(&vendor),
        GENERATE,
        json!({"prompt": "   ", "orientation": "landscape"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(vendor.query_count(), 0);
}

#[tokio::test]
async fn vendor_http_error_keeps_vendor_status() {
    let vendor = FakeVendor::new(SubmitBehaviour::HttpError(401, "invalid api key"), vec![]);

    let response = post_json(
        app_with(&vendor),
        GENERATE,
        json!({"prompt": "city", "orientation": "landscape"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Video provider error: 401");
    assert_eq!(json["details"], "invalid api key");
}

#[tokio::test]
async fn failed_generation_is_500() {
    let vendor = FakeVendor::new(
        SubmitBehaviour::Accept,
        vec![poll(TaskStatus::Processing), poll(TaskStatus::Fail)],
    );

    let response = post_json(
        app_with(&vendor),
        GENERATE,
        json!({"prompt": "city", "orientation": "landscape"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GENERATION_FAILED");
    assert_eq!(json["error"], "Video generation failed with status: Fail");
}

#[tokio::test]
async fn poll_cap_is_408() {
    let vendor = FakeVendor::new(SubmitBehaviour::Accept, vec![poll(TaskStatus::Processing)]);

    let response = post_json(
        app_with(&vendor),
        GENERATE,
        json!({"prompt": "city", "orientation": "portrait"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "TIMEOUT");
    // Test config caps polling at three queries.
    assert_eq!(vendor.query_count(), 3);
}

#[tokio::test]
async fn missing_credentials_is_500() {
    let response = post_json(
        common::build_test_app(None),
        GENERATE,
        json!({"prompt": "city", "orientation": "portrait"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Video provider API key not configured");
}

#[tokio::test]
async fn unknown_orientation_is_a_client_error() {
    let vendor = FakeVendor::new(SubmitBehaviour::Accept, vec![finished("x")]);

    let response = post_json(
        app_with(&vendor),
        GENERATE,
        json!({"prompt": "city", "orientation": "square"}),
    )
    .await;

    assert!(response.status().is_client_error());
    assert_eq!(vendor.query_count(), 0);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let vendor = FakeVendor::new(SubmitBehaviour::Accept, vec![]);
    let response = app_with(&vendor)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri(GENERATE)
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}
