use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use wallmania_core::error::CoreError;
use wallmania_providers::video::VideoError;
use wallmania_providers::ProviderError;

/// Error type for relay handlers.
///
/// Renders as `{ "error", "code", "details"? }`. Vendor HTTP failures
/// keep the vendor's status code so clients can tell auth problems from
/// outages.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Video(#[from] VideoError),

    /// The configured vendor has no credentials.
    #[error("Video provider API key not configured")]
    NotConfigured,
}

pub type RelayResult<T> = Result<T, RelayError>;

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            RelayError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            RelayError::Core(other) => {
                tracing::error!(error = %other, "Internal core error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            RelayError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "NOT_CONFIGURED",
                self.to_string(),
                None,
            ),
            RelayError::Video(err) => classify_video_error(err),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Map a video failure onto status, code, message, and details.
fn classify_video_error(err: &VideoError) -> (StatusCode, &'static str, String, Option<String>) {
    match err {
        VideoError::Provider(ProviderError::Api { status, body }) => {
            tracing::warn!(vendor_status = status, "Video provider returned an error");
            (
                StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                "PROVIDER_ERROR",
                format!("Video provider error: {status}"),
                Some(body.clone()),
            )
        }
        VideoError::Provider(other) => {
            tracing::warn!(error = %other, "Video provider request failed");
            (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                "Video provider request failed".to_string(),
                Some(other.to_string()),
            )
        }
        VideoError::GenerationFailed { status, detail } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_FAILED",
            err.to_string(),
            Some(detail.clone().unwrap_or_else(|| status.to_string())),
        ),
        VideoError::Timeout { .. } => (
            StatusCode::REQUEST_TIMEOUT,
            "TIMEOUT",
            err.to_string(),
            None,
        ),
        VideoError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SHUTTING_DOWN",
            "Server is shutting down".to_string(),
            None,
        ),
        VideoError::Relay { error, details } => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_ERROR",
            error.clone(),
            details.clone(),
        ),
    }
}
