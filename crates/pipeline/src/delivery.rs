//! Getting finished wallpapers off the gallery: download to a
//! directory, share through the native surface, or hand off to the
//! Android wallpaper picker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wallmania_core::codec::{is_display_reference, parse_display_reference, sniff_mime};
use wallmania_core::naming::{download_filename, mime_for_extension};
use wallmania_core::record::GenerationRecord;
use wallmania_core::share::{share_link, share_text, SocialTarget};
use wallmania_core::types::Platform;
use wallmania_providers::http::download;

use crate::error::PipelineError;
use crate::quota::QuotaTracker;
use crate::surface::{NativeSurface, ShareRequest};

const FILE_SCHEME: &str = "file://";
const FALLBACK_MIME: &str = "application/octet-stream";
const SHARE_TITLE: &str = "AI Generated Wallpaper";
const WALLPAPER_DIALOG_TITLE: &str = "Set as Wallpaper";

/// Shown when the platform cannot apply wallpapers.
pub const WALLPAPER_UNSUPPORTED_MESSAGE: &str =
    "Setting wallpapers is only supported on Android. Download the image and set it manually.";

/// `file://` URI for an absolute path.
pub fn file_uri(path: &Path) -> String {
    format!("{FILE_SCHEME}{}", path.display())
}

/// Local path for a `file://` URI or bare path.
pub fn path_from_file_uri(locator: &str) -> PathBuf {
    PathBuf::from(locator.strip_prefix(FILE_SCHEME).unwrap_or(locator))
}

/// Asset bytes resolved from a record's `asset_ref`.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// No downloads left today; nothing was written or spent.
    QuotaExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallpaperOutcome {
    /// The asset was written to this path and the picker opened.
    Opened(PathBuf),
    Unsupported(&'static str),
}

#[derive(Clone)]
pub struct DeliveryService {
    http: reqwest::Client,
    quota: QuotaTracker,
    surface: Arc<dyn NativeSurface>,
}

impl DeliveryService {
    pub fn new(http: reqwest::Client, quota: QuotaTracker, surface: Arc<dyn NativeSurface>) -> Self {
        Self {
            http,
            quota,
            surface,
        }
    }

    pub fn platform(&self) -> Platform {
        self.surface.platform()
    }

    /// Load the bytes behind `asset_ref`: `data:` locators are decoded
    /// in-process, `http(s)` URLs fetched, anything else read from disk.
    pub async fn resolve_asset(&self, asset_ref: &str) -> Result<ResolvedAsset, PipelineError> {
        if is_display_reference(asset_ref) {
            let decoded = parse_display_reference(asset_ref)?;
            return Ok(ResolvedAsset {
                bytes: decoded.bytes,
                mime_type: decoded.mime_type,
            });
        }

        if asset_ref.starts_with("http://") || asset_ref.starts_with("https://") {
            let body = download(&self.http, asset_ref).await?;
            let mime_type = body
                .content_type
                .filter(|ct| ct.starts_with("image/") || ct.starts_with("video/"))
                .or_else(|| sniff_mime(&body.bytes).map(str::to_string))
                .or_else(|| mime_from_path(Path::new(asset_ref)).map(str::to_string))
                .unwrap_or_else(|| FALLBACK_MIME.to_string());
            return Ok(ResolvedAsset {
                bytes: body.bytes,
                mime_type,
            });
        }

        let path = path_from_file_uri(asset_ref);
        let bytes = tokio::fs::read(&path).await?;
        let mime_type = sniff_mime(&bytes)
            .or_else(|| mime_from_path(&path))
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        Ok(ResolvedAsset { bytes, mime_type })
    }

    /// Save `record` into `dir` as `wallpaper-{id}.{ext}`.
    ///
    /// The download allowance is checked first and spent only after the
    /// file was written.
    pub async fn download(
        &self,
        record: &GenerationRecord,
        dir: &Path,
        is_premium: bool,
    ) -> Result<DownloadOutcome, PipelineError> {
        if !self.quota.can_download(is_premium).await? {
            tracing::info!(record_id = %record.id, "Download refused by quota");
            return Ok(DownloadOutcome::QuotaExhausted);
        }

        let path = self.write_asset(record, dir).await?;
        if !self.quota.consume_for_download(is_premium).await? {
            // Another writer spent the last download between gate and spend.
            tracing::warn!(record_id = %record.id, "Download allowance spent concurrently; keeping file");
        }
        tracing::info!(record_id = %record.id, path = %path.display(), "Wallpaper downloaded");
        Ok(DownloadOutcome::Saved(path))
    }

    /// Write the asset to `cache_dir` and open the share sheet.
    pub async fn share(
        &self,
        record: &GenerationRecord,
        cache_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.write_asset(record, cache_dir).await?;
        self.surface
            .share(ShareRequest {
                title: SHARE_TITLE.to_string(),
                text: share_text(&record.prompt),
                file_uri: file_uri(&path),
                dialog_title: None,
            })
            .await?;
        tracing::info!(record_id = %record.id, platform = ?self.platform(), "Wallpaper shared");
        Ok(path)
    }

    /// Hand the asset to the Android wallpaper picker. Other platforms
    /// get [`WallpaperOutcome::Unsupported`].
    pub async fn set_as_wallpaper(
        &self,
        record: &GenerationRecord,
        cache_dir: &Path,
    ) -> Result<WallpaperOutcome, PipelineError> {
        if !self.platform().can_set_wallpaper() {
            return Ok(WallpaperOutcome::Unsupported(WALLPAPER_UNSUPPORTED_MESSAGE));
        }

        let path = self.write_asset(record, cache_dir).await?;
        self.surface
            .share(ShareRequest {
                title: WALLPAPER_DIALOG_TITLE.to_string(),
                text: share_text(&record.prompt),
                file_uri: file_uri(&path),
                dialog_title: Some(WALLPAPER_DIALOG_TITLE.to_string()),
            })
            .await?;
        Ok(WallpaperOutcome::Opened(path))
    }

    /// Web intent links for every supported social target.
    pub fn share_links(&self, record: &GenerationRecord, app_url: &str) -> Vec<(SocialTarget, String)> {
        SocialTarget::ALL
            .iter()
            .map(|&target| (target, share_link(target, &record.prompt, app_url)))
            .collect()
    }

    async fn write_asset(&self, record: &GenerationRecord, dir: &Path) -> Result<PathBuf, PipelineError> {
        let asset = self.resolve_asset(&record.asset_ref).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(download_filename(&record.id, &asset.mime_type));
        tokio::fs::write(&path, &asset.bytes).await?;
        Ok(tokio::fs::canonicalize(&path).await?)
    }
}

fn mime_from_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
}
