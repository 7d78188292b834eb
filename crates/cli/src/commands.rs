//! Command handlers. Each prints a short human-readable result to
//! stdout; diagnostics go through `tracing` to stderr.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use wallmania_core::clock::Clock;
use wallmania_core::record::GenerationRecord;
use wallmania_core::types::MediaKind;
use wallmania_db::KeyValueStore;
use wallmania_pipeline::{
    AppContext, ContextOptions, DownloadOutcome, GalleryFilter, HeadlessSurface, ImageOutcome,
    VideoOutcome, WallpaperOutcome,
};
use wallmania_providers::image::ImageGenerator;
use wallmania_providers::video::minimax::MinimaxProvider;
use wallmania_providers::video::runway::RunwayProvider;
use wallmania_providers::video::{RelayClient, VideoBackend, VideoClient, VideoProvider};

use crate::cli::{Command, GenerateKind};
use crate::config::{AppConfig, VideoSettings};

/// Assemble the service graph described by `config`.
pub fn build_context(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    http: reqwest::Client,
) -> AppContext {
    let options = ContextOptions {
        limits: config.limits,
        media_dir: config.media_dir.clone(),
        http: http.clone(),
        images: ImageGenerator::with_client(http.clone(), config.images.clone()),
        video: build_video_client(config, http),
        surface: Arc::new(HeadlessSurface::new(config.platform)),
    };
    AppContext::new(store, clock, options)
}

fn build_video_client(config: &AppConfig, http: reqwest::Client) -> Option<VideoClient> {
    let backend = match &config.video {
        VideoSettings::Minimax(minimax) => {
            let provider: Arc<dyn VideoProvider> =
                Arc::new(MinimaxProvider::new(http.clone(), minimax.clone()));
            VideoBackend::Direct(provider)
        }
        VideoSettings::Runway(runway) => {
            let provider: Arc<dyn VideoProvider> =
                Arc::new(RunwayProvider::new(http.clone(), runway.clone()));
            VideoBackend::Direct(provider)
        }
        VideoSettings::Relay { url } => {
            VideoBackend::Relay(RelayClient::new(http.clone(), url).with_poll_budget(&config.poll))
        }
        VideoSettings::Unconfigured { backend } => {
            tracing::warn!(backend, "Video backend has no credentials; video generation disabled");
            return None;
        }
    };
    Some(VideoClient::new(http, backend, config.poll))
}

/// Execute one parsed command.
pub async fn run(
    command: Command,
    ctx: &AppContext,
    config: &AppConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let is_premium = ctx.entitlements.is_premium().await?;

    match command {
        Command::Generate { kind } => generate(kind, ctx, is_premium, cancel).await,

        Command::Gallery {
            favorites,
            search,
            orientation,
        } => {
            let filter = GalleryFilter {
                favorites_only: favorites,
                search_text: search,
                orientation,
            };
            let records = ctx.gallery.list(&filter).await?;
            if records.is_empty() {
                println!("No wallpapers found.");
            }
            for record in &records {
                println!("{}", gallery_line(record));
            }
            Ok(())
        }

        Command::Favorite { id } => {
            let favorite = ctx
                .gallery
                .toggle_favorite(&id)
                .await?
                .with_context(|| format!("No wallpaper with id {id}"))?;
            if favorite {
                println!("Added {id} to favorites.");
            } else {
                println!("Removed {id} from favorites.");
            }
            Ok(())
        }

        Command::Download { id, dir } => {
            let record = find(ctx, &id).await?;
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            match ctx.delivery.download(&record, &dir, is_premium).await? {
                DownloadOutcome::Saved(path) => println!("Saved {}", path.display()),
                DownloadOutcome::QuotaExhausted => println!(
                    "Daily download limit reached ({} per day). Upgrade to premium for unlimited downloads.",
                    config.limits.daily_downloads
                ),
            }
            Ok(())
        }

        Command::Share { id, links } => {
            let record = find(ctx, &id).await?;
            if links {
                for (target, link) in ctx.delivery.share_links(&record, &config.app_url) {
                    println!("{:<9} {link}", target.label());
                }
            } else {
                let path = ctx
                    .delivery
                    .share(&record, &config.cache_dir)
                    .await
                    .context("Sharing failed")?;
                println!("Shared {}", path.display());
            }
            Ok(())
        }

        Command::SetWallpaper { id } => {
            let record = find(ctx, &id).await?;
            match ctx.delivery.set_as_wallpaper(&record, &config.cache_dir).await? {
                WallpaperOutcome::Opened(path) => {
                    println!("Opened wallpaper picker for {}", path.display())
                }
                WallpaperOutcome::Unsupported(message) => println!("{message}"),
            }
            Ok(())
        }

        Command::Usage => {
            let stats = ctx.quota.usage_stats(is_premium).await?;
            if stats.is_premium {
                println!("Plan:       premium (unlimited)");
            } else {
                println!("Plan:       free");
            }
            println!("Images:     {} generated today", stats.images_generated);
            println!(
                "Tokens:     {} used, {} remaining",
                stats.tokens_used, stats.tokens_remaining
            );
            println!(
                "Downloads:  {} used, {} remaining",
                stats.downloads_used, stats.downloads_remaining
            );
            Ok(())
        }

        Command::Upgrade => {
            let entitlement = ctx.entitlements.upgrade().await?;
            match entitlement.upgraded_at {
                Some(at) => println!("Premium active since {}", at.format("%Y-%m-%d %H:%M UTC")),
                None => println!("Premium active"),
            }
            Ok(())
        }
    }
}

async fn generate(
    kind: GenerateKind,
    ctx: &AppContext,
    is_premium: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    match kind {
        GenerateKind::Image {
            prompt,
            orientation,
        } => match ctx
            .generation
            .generate_image(&prompt, orientation, is_premium)
            .await?
        {
            ImageOutcome::Generated(record) => println!("Generated {}", gallery_line(&record)),
            ImageOutcome::QuotaExhausted { remaining_tokens } => println!(
                "Not enough tokens left today ({remaining_tokens} remaining). Upgrade to premium for unlimited generations."
            ),
        },
        GenerateKind::Video {
            prompt,
            orientation,
        } => match ctx
            .generation
            .generate_video(&prompt, orientation, is_premium, cancel)
            .await
            .context("Video generation failed")?
        {
            VideoOutcome::Generated(record) => println!("Generated {}", gallery_line(&record)),
            VideoOutcome::PremiumRequired => {
                println!("Video generation is a premium feature. Run `wallmania upgrade` first.")
            }
        },
    }
    Ok(())
}

async fn find(ctx: &AppContext, id: &str) -> anyhow::Result<GenerationRecord> {
    ctx.gallery
        .get(id)
        .await?
        .with_context(|| format!("No wallpaper with id {id}"))
}

fn gallery_line(record: &GenerationRecord) -> String {
    let kind = match record.media_kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
    };
    format!(
        "{}  {}  {:<9} {:<5} {} {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.orientation.as_str(),
        kind,
        if record.is_favorite { "*" } else { " " },
        record.prompt,
    )
}
