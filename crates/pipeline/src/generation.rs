//! Generation orchestration: validate, gate, generate, persist.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wallmania_core::clock::Clock;
use wallmania_core::codec::{to_display_reference, to_persistable_form};
use wallmania_core::naming::extension_for_mime;
use wallmania_core::quota::Allowance;
use wallmania_core::record::{new_record_id, validate_prompt, GenerationRecord};
use wallmania_core::types::{MediaKind, Orientation};
use wallmania_providers::image::ImageGenerator;
use wallmania_providers::video::VideoClient;

use crate::delivery::file_uri;
use crate::error::PipelineError;
use crate::gallery::Gallery;
use crate::quota::QuotaTracker;

/// Result of an image request.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Generated(GenerationRecord),
    /// Not enough tokens left today; nothing was generated or spent.
    QuotaExhausted { remaining_tokens: u32 },
}

/// Result of a video request.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoOutcome {
    Generated(GenerationRecord),
    /// Video generation is reserved for premium users.
    PremiumRequired,
}

pub struct GenerationService {
    clock: Arc<dyn Clock>,
    quota: QuotaTracker,
    gallery: Gallery,
    images: ImageGenerator,
    video: Option<VideoClient>,
    media_dir: PathBuf,
}

impl GenerationService {
    pub fn new(
        clock: Arc<dyn Clock>,
        quota: QuotaTracker,
        gallery: Gallery,
        images: ImageGenerator,
        video: Option<VideoClient>,
        media_dir: PathBuf,
    ) -> Self {
        Self {
            clock,
            quota,
            gallery,
            images,
            video,
            media_dir,
        }
    }

    /// Generate and store an image wallpaper.
    ///
    /// Tokens are spent only after an image was obtained, and exactly
    /// once per call. The image is embedded in the record as a `data:`
    /// locator.
    pub async fn generate_image(
        &self,
        prompt: &str,
        orientation: Orientation,
        is_premium: bool,
    ) -> Result<ImageOutcome, PipelineError> {
        let prompt = validate_prompt(prompt)?;

        if !self.quota.can_generate_image(is_premium).await? {
            let remaining = self.quota.remaining_tokens(false).await?;
            tracing::info!(%remaining, "Image generation refused by quota");
            return Ok(ImageOutcome::QuotaExhausted {
                remaining_tokens: match remaining {
                    Allowance::Limited(n) => n,
                    Allowance::Unlimited => u32::MAX,
                },
            });
        }

        tracing::info!(prompt_len = prompt.len(), %orientation, "Generating image");
        let image = self.images.generate(prompt, orientation).await?;
        let asset_ref = to_display_reference(&to_persistable_form(&image.bytes), &image.mime_type);

        if !self.quota.consume_for_image(is_premium).await? {
            // Another writer spent the last tokens between gate and spend.
            tracing::warn!("Quota spent concurrently; keeping generated image");
        }

        let record = GenerationRecord::new(
            prompt,
            orientation,
            MediaKind::Image,
            asset_ref,
            self.clock.now(),
        );
        self.gallery.add(&record).await?;
        tracing::info!(
            record_id = %record.id,
            source = image.source.as_str(),
            size_bytes = image.bytes.len(),
            "Image generated",
        );
        Ok(ImageOutcome::Generated(record))
    }

    /// Generate and store a video wallpaper (premium only).
    ///
    /// The video is written to `{media_dir}/{id}.mp4` and referenced by
    /// its `file://` URI.
    pub async fn generate_video(
        &self,
        prompt: &str,
        orientation: Orientation,
        is_premium: bool,
        cancel: &CancellationToken,
    ) -> Result<VideoOutcome, PipelineError> {
        let prompt = validate_prompt(prompt)?;

        if !is_premium {
            tracing::info!("Video generation requires premium");
            return Ok(VideoOutcome::PremiumRequired);
        }
        let video = self
            .video
            .as_ref()
            .ok_or(PipelineError::NotConfigured("Video generation"))?;

        tracing::info!(prompt_len = prompt.len(), %orientation, "Generating video");
        let asset = video.generate(prompt, orientation, cancel).await?;

        let id = new_record_id();
        tokio::fs::create_dir_all(&self.media_dir).await?;
        let path = self
            .media_dir
            .join(format!("{id}.{}", extension_for_mime(&asset.mime_type)));
        tokio::fs::write(&path, &asset.bytes).await?;
        let path = tokio::fs::canonicalize(&path).await?;

        let record = GenerationRecord::with_id(
            id,
            prompt,
            orientation,
            MediaKind::Video,
            file_uri(&path),
            self.clock.now(),
        );
        self.gallery.add(&record).await?;
        tracing::info!(
            record_id = %record.id,
            size_bytes = asset.bytes.len(),
            path = %path.display(),
            "Video generated",
        );
        Ok(VideoOutcome::Generated(record))
    }
}
