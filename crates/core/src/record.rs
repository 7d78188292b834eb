//! Gallery record for a single successful generation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{MediaKind, Orientation, Timestamp};

/// A generated wallpaper as stored in the local gallery.
///
/// Created once on successful generation. Only `is_favorite` may change
/// afterwards; `asset_ref` is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// Time-ordered UUID v7.
    pub id: String,
    pub prompt: String,
    pub orientation: Orientation,
    #[serde(default = "default_media_kind")]
    pub media_kind: MediaKind,
    /// Remote URL, `data:` locator, or `file://` URI.
    #[serde(alias = "url")]
    pub asset_ref: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub is_favorite: bool,
}

fn default_media_kind() -> MediaKind {
    MediaKind::Image
}

impl GenerationRecord {
    pub fn new(
        prompt: impl Into<String>,
        orientation: Orientation,
        media_kind: MediaKind,
        asset_ref: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self::with_id(
            new_record_id(),
            prompt,
            orientation,
            media_kind,
            asset_ref,
            created_at,
        )
    }

    /// Build a record with a caller-chosen id (used when the id must be
    /// known before the asset is written, e.g. video files named by id).
    pub fn with_id(
        id: String,
        prompt: impl Into<String>,
        orientation: Orientation,
        media_kind: MediaKind,
        asset_ref: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            orientation,
            media_kind,
            asset_ref: asset_ref.into(),
            created_at,
            is_favorite: false,
        }
    }
}

/// Generate a new time-derived record id.
pub fn new_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Reject empty or whitespace-only prompts.
///
/// Returns the trimmed prompt on success.
pub fn validate_prompt(prompt: &str) -> Result<&str, CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Please enter a prompt to generate a wallpaper".to_string(),
        ));
    }
    Ok(trimmed)
}
