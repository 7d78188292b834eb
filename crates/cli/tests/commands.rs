//! Command handlers over an in-memory store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use wallmania_cli::cli::{Command, GenerateKind};
use wallmania_cli::commands::{build_context, run};
use wallmania_cli::config::AppConfig;
use wallmania_core::clock::FixedClock;
use wallmania_core::quota::Allowance;
use wallmania_core::types::Orientation;
use wallmania_db::MemoryKvStore;
use wallmania_pipeline::{AppContext, GalleryFilter};

struct Harness {
    ctx: AppContext,
    config: AppConfig,
    _dir: tempfile::TempDir,
}

fn harness(extra: &[(&str, &str)]) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    let mut env: HashMap<String, String> = HashMap::from([
        // Nothing listens on port 9: both remote image providers fail
        // fast and generation falls through to the local placeholder.
        ("IMAGE_PRIMARY_URL".into(), "http://127.0.0.1:9".into()),
        ("IMAGE_FALLBACK_URL".into(), "http://127.0.0.1:9".into()),
        ("MEDIA_DIR".into(), format!("{root}/media")),
        ("DOWNLOAD_DIR".into(), format!("{root}/downloads")),
        ("CACHE_DIR".into(), format!("{root}/cache")),
    ]);
    for (k, v) in extra {
        env.insert(k.to_string(), v.to_string());
    }
    let config = AppConfig::from_lookup(|name| env.get(name).cloned()).unwrap();

    let ctx = build_context(
        &config,
        Arc::new(MemoryKvStore::new()),
        Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())),
        reqwest::Client::new(),
    );
    Harness {
        ctx,
        config,
        _dir: dir,
    }
}

async fn exec(h: &Harness, command: Command) -> anyhow::Result<()> {
    run(command, &h.ctx, &h.config, &CancellationToken::new()).await
}

fn image(prompt: &str) -> Command {
    Command::Generate {
        kind: GenerateKind::Image {
            prompt: prompt.into(),
            orientation: Orientation::Portrait,
        },
    }
}

#[tokio::test]
async fn generate_then_download_spends_allowances() {
    let h = harness(&[]);

    exec(&h, image("aurora over fjord")).await.unwrap();

    let records = h.ctx.gallery.list(&GalleryFilter::default()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        h.ctx.quota.remaining_tokens(false).await.unwrap(),
        Allowance::Limited(450)
    );

    exec(
        &h,
        Command::Download {
            id: records[0].id.clone(),
            dir: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        h.ctx.quota.remaining_downloads(false).await.unwrap(),
        Allowance::Limited(4)
    );
    let saved: Vec<_> = std::fs::read_dir(&h.config.download_dir).unwrap().collect();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn favorite_toggles_and_unknown_id_errors() {
    let h = harness(&[]);
    exec(&h, image("desert dunes")).await.unwrap();
    let id = h.ctx.gallery.list(&GalleryFilter::default()).await.unwrap()[0]
        .id
        .clone();

    exec(&h, Command::Favorite { id: id.clone() }).await.unwrap();
    let favorites = GalleryFilter {
        favorites_only: true,
        ..Default::default()
    };
    assert_eq!(h.ctx.gallery.list(&favorites).await.unwrap().len(), 1);

    let err = exec(&h, Command::Favorite { id: "missing".into() })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn video_without_premium_spends_nothing() {
    let h = harness(&[]);

    exec(
        &h,
        Command::Generate {
            kind: GenerateKind::Video {
                prompt: "rain on glass".into(),
                orientation: Orientation::Landscape,
            },
        },
    )
    .await
    .unwrap();

    assert!(h.ctx.gallery.list(&GalleryFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn premium_video_without_backend_is_an_error() {
    let h = harness(&[]);
    exec(&h, Command::Upgrade).await.unwrap();
    assert!(h.ctx.entitlements.is_premium().await.unwrap());

    let err = exec(
        &h,
        Command::Generate {
            kind: GenerateKind::Video {
                prompt: "rain on glass".into(),
                orientation: Orientation::Landscape,
            },
        },
    )
    .await
    .unwrap_err();
    assert!(format!("{err:#}").contains("not configured"));
}

#[tokio::test]
async fn set_wallpaper_on_desktop_writes_nothing() {
    let h = harness(&[]);
    exec(&h, image("forest")).await.unwrap();
    let id = h.ctx.gallery.list(&GalleryFilter::default()).await.unwrap()[0]
        .id
        .clone();

    exec(&h, Command::SetWallpaper { id }).await.unwrap();
    assert!(!h.config.cache_dir.exists());
}

#[tokio::test]
async fn share_on_android_stages_file_in_cache() {
    let h = harness(&[("PLATFORM", "android")]);
    exec(&h, image("lighthouse")).await.unwrap();
    let id = h.ctx.gallery.list(&GalleryFilter::default()).await.unwrap()[0]
        .id
        .clone();

    exec(&h, Command::Share { id, links: false }).await.unwrap();
    let staged: Vec<_> = std::fs::read_dir(&h.config.cache_dir).unwrap().collect();
    assert_eq!(staged.len(), 1);
}

#[tokio::test]
async fn usage_works_on_a_fresh_store() {
    let h = harness(&[]);
    exec(&h, Command::Usage).await.unwrap();
}
