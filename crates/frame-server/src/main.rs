//! WebSocket frame server with its static asset server.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use frame_core::RotatingSource;
use frame_server::{assets, page, Config, Server};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;

    if config.generate_placeholders {
        let written = assets::ensure_artifacts(
            &config.asset_dir,
            &config.artifact_pattern,
            config.artifact_count,
        )
        .await
        .with_context(|| format!("writing placeholders in {}", config.asset_dir.display()))?;
        info!(written, pattern = %config.artifact_pattern, "placeholder artifacts generated");
    }

    info!(
        control = %config.control_addr(),
        assets = %config.asset_addr(),
        artifact_count = config.artifact_count,
        pattern = %config.artifact_pattern,
        latency_ms = config.latency_ms,
        "starting frame-server"
    );

    let source = Arc::new(
        RotatingSource::new(config.artifact_count, config.latency())
            .with_pattern(config.artifact_pattern.clone()),
    );
    let server = Server::bind(&config, source).await?;
    let asset_listener = assets::bind(&config.asset_addr()).await?;
    let page = page::bootstrap_page(config.control_port, &config.artifact_pattern.render(0));
    let router = assets::router(config.asset_dir.clone(), page);

    let (stop_tx, stop_rx) = watch::channel(());
    let control = tokio::spawn(server.run(stopped(stop_rx.clone())));
    let static_assets = tokio::spawn(assets::serve(asset_listener, router, stopped(stop_rx)));

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    let _ = stop_tx.send(());

    control.await??;
    static_assets.await??;
    Ok(())
}

async fn stopped(mut rx: watch::Receiver<()>) {
    let _ = rx.changed().await;
}
