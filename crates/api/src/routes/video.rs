//! `POST /functions/v1/generate-video`: run a full video job for the
//! caller and answer with the downloadable URL.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use wallmania_core::record::validate_prompt;
use wallmania_providers::video::relay::{RelayRequest, RelaySuccess};
use wallmania_providers::video::{poll_until_terminal, submit, VideoError};

use crate::error::{RelayError, RelayResult};
use crate::state::AppState;

async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<RelayRequest>,
) -> RelayResult<Json<RelaySuccess>> {
    let prompt = validate_prompt(&request.prompt)?;
    let provider = state.video.as_ref().ok_or(RelayError::NotConfigured)?;

    tracing::info!(
        provider = provider.name(),
        prompt_len = prompt.len(),
        orientation = %request.orientation,
        "Relay video generation started",
    );

    let mut task = submit(provider.as_ref(), prompt, request.orientation).await?;
    let locator = poll_until_terminal(
        provider.as_ref(),
        &mut task,
        &state.config.poll,
        &state.shutdown,
    )
    .await?;
    let video_url = provider
        .resolve_download_url(&locator)
        .await
        .map_err(VideoError::from)?;

    tracing::info!(
        task_id = %task.task_id,
        attempts = task.poll_attempt,
        "Relay video generation completed",
    );
    Ok(Json(RelaySuccess { video_url }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-video", post(generate_video))
}
