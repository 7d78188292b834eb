//! Native share surface.
//!
//! The OS share sheet is an external collaborator; this trait is the
//! seam. [`HeadlessSurface`] stands in when there is no native shell.

use wallmania_core::types::Platform;

/// Failure reported by the native surface.
#[derive(Debug, thiserror::Error)]
#[error("Share failed: {0}")]
pub struct SurfaceError(pub String);

/// Payload for the native share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    /// `file://` URI of the asset written to the cache directory.
    pub file_uri: String,
    /// Title of the chooser dialog, when the platform shows one.
    pub dialog_title: Option<String>,
}

#[async_trait::async_trait]
pub trait NativeSurface: Send + Sync {
    fn platform(&self) -> Platform;

    async fn share(&self, request: ShareRequest) -> Result<(), SurfaceError>;
}

/// Surface with no share sheet: requests are logged and reported as
/// handled, leaving the written file for the user to pick up.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessSurface {
    platform: Platform,
}

impl HeadlessSurface {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(Platform::Desktop)
    }
}

#[async_trait::async_trait]
impl NativeSurface for HeadlessSurface {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn share(&self, request: ShareRequest) -> Result<(), SurfaceError> {
        tracing::info!(
            title = %request.title,
            file_uri = %request.file_uri,
            dialog_title = request.dialog_title.as_deref().unwrap_or(""),
            "No native share sheet; asset left in cache",
        );
        Ok(())
    }
}
