use anyhow::Context;
use clip_ranking_service::config::LogFormat;
use clip_ranking_service::services::JsonFileSource;
use clip_ranking_service::{ClipFeed, Config, ModeHolder, RankingEngine};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load config")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.service.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    info!(
        service = %config.service.service_name,
        mode = config.ranking.default_mode.as_str(),
        decay = config.ranking.decay.kind(),
        snapshot = %config.feed.snapshot_path,
        "Starting clip ranking"
    );

    let mode = Arc::new(ModeHolder::new(config.ranking.default_mode));
    let feed = ClipFeed::new(
        JsonFileSource::new(&config.feed.snapshot_path),
        RankingEngine::new(config.ranking.decay),
        mode,
    )
    .with_limit(config.feed.max_clip_results)
    .with_fetch_timeout(config.feed.fetch_timeout);

    let ranked = feed.load().await.map_err(|e| {
        error!("Clip feed load failed: {}", e);
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&ranked)?);

    Ok(())
}
