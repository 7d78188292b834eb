//! `wallmania` CLI.
//!
//! Configuration is read from the environment (and a `.env` file when
//! present); see [`AppConfig::from_env`] for the variables. Logs go to
//! stderr so command output on stdout stays clean.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallmania_cli::cli::Cli;
use wallmania_cli::commands::{build_context, run};
use wallmania_cli::config::AppConfig;
use wallmania_core::clock::LocalClock;
use wallmania_db::SqliteKvStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "wallmania_cli=info,wallmania_pipeline=info,wallmania_providers=info".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;
    tracing::debug!(
        database_url = %config.database_url,
        media_dir = %config.media_dir.display(),
        platform = ?config.platform,
        "Loaded configuration",
    );

    let pool = wallmania_db::create_pool(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    wallmania_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .context("Failed to build HTTP client")?;

    let ctx = build_context(
        &config,
        Arc::new(SqliteKvStore::new(pool.clone())),
        Arc::new(LocalClock),
        http,
    );

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            on_ctrl_c.cancel();
        }
    });

    let result = run(cli.command, &ctx, &config, &cancel).await;
    pool.close().await;
    result
}
