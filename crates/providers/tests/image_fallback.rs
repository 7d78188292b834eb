//! Image fallback chain against local mock providers.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use wallmania_core::types::Orientation;
use wallmania_providers::image::{ImageGenerator, ImageProviderConfig, ImageSource};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

type Hits = Arc<Mutex<Vec<String>>>;

fn config(primary: String, fallback: String) -> ImageProviderConfig {
    ImageProviderConfig {
        primary_base_url: primary,
        fallback_base_url: fallback,
        request_timeout: Duration::from_secs(5),
    }
}

async fn healthy_primary(
    State(hits): State<Hits>,
    Path(prompt): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    hits.lock().unwrap().push(format!(
        "{prompt}|{}x{}|{}",
        params.get("width").cloned().unwrap_or_default(),
        params.get("height").cloned().unwrap_or_default(),
        params.get("model").cloned().unwrap_or_default(),
    ));
    ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES)
}

async fn broken_primary(State(hits): State<Hits>) -> impl IntoResponse {
    hits.lock().unwrap().push("primary".to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded")
}

async fn stock_photo(
    State(hits): State<Hits>,
    Path((w, h)): Path<(u32, u32)>,
) -> impl IntoResponse {
    hits.lock().unwrap().push(format!("fallback|{w}x{h}"));
    // No content type: the generator must sniff it.
    JPEG_BYTES.to_vec()
}

#[tokio::test]
async fn primary_success_is_used_directly() {
    let hits = Hits::default();
    let primary = common::spawn_server(
        Router::new()
            .route("/prompt/{prompt}", get(healthy_primary))
            .with_state(hits.clone()),
    )
    .await;
    let generator = ImageGenerator::new(config(primary, common::dead_url().await));

    let image = generator
        .generate("misty forest", Orientation::Portrait)
        .await
        .unwrap();

    assert_eq!(image.source, ImageSource::Primary);
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.bytes, JPEG_BYTES);
    assert_eq!(*hits.lock().unwrap(), vec!["misty forest|1080x1920|flux"]);
}

#[tokio::test]
async fn primary_failure_falls_back_to_stock_photo() {
    let hits = Hits::default();
    let primary = common::spawn_server(
        Router::new()
            .route("/prompt/{prompt}", get(broken_primary))
            .with_state(hits.clone()),
    )
    .await;
    let fallback = common::spawn_server(
        Router::new()
            .route("/{w}/{h}", get(stock_photo))
            .with_state(hits.clone()),
    )
    .await;
    let generator = ImageGenerator::new(config(primary, fallback));

    let image = generator
        .generate("city skyline", Orientation::Landscape)
        .await
        .unwrap();

    assert_eq!(image.source, ImageSource::Fallback);
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(*hits.lock().unwrap(), vec!["primary", "fallback|1920x1080"]);
}

#[tokio::test]
async fn both_providers_down_yields_placeholder() {
    let generator = ImageGenerator::new(config(
        common::dead_url().await,
        common::dead_url().await,
    ));

    let image = generator
        .generate("cosmic ocean", Orientation::Portrait)
        .await
        .unwrap();

    assert_eq!(image.source, ImageSource::Placeholder);
    assert_eq!(image.mime_type, "image/png");
    assert!(image.bytes.starts_with(PNG_MAGIC));
}

#[tokio::test]
async fn empty_primary_body_is_a_failure() {
    let primary = common::spawn_server(Router::new().route(
        "/prompt/{prompt}",
        get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], Vec::<u8>::new()) }),
    ))
    .await;
    let generator = ImageGenerator::new(config(primary, common::dead_url().await));

    let image = generator.generate("sunset", Orientation::Portrait).await.unwrap();

    assert_eq!(image.source, ImageSource::Placeholder);
}
