//! Cloudview — Binary Entrypoint
//! Boots the per-source pollers and the Axum query server, wiring the
//! snapshot store, routes, and middleware.
//!
//! See `README.md` for quickstart and `DESIGN.md` for architecture notes.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cloudview::api::{create_router, AppState};
use cloudview::config::AppConfig;
use cloudview::metrics::Metrics;
use cloudview::poller::spawn_poller;
use cloudview::sources::{build_adapters, UpstreamClient};
use cloudview::store::SnapshotStore;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cloudview=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        listen = %cfg.listen_addr,
        gateway = %cfg.gateway_url,
        "starting cloudview"
    );

    let metrics = Metrics::init();

    // One store entry per source, Unknown until its first poll completes.
    let store = Arc::new(SnapshotStore::new());

    // --- Background pollers: one independent loop per source ---
    let client = UpstreamClient::new(cfg.gateway_url.clone())?;
    for adapter in build_adapters(&client) {
        let source = adapter.source();
        let poller_cfg = cfg.poller_config(source);
        tracing::info!(
            source = %source,
            interval_secs = poller_cfg.interval.as_secs(),
            "spawning poller"
        );
        spawn_poller(Arc::clone(&store), adapter, poller_cfg);
    }

    // --- Query server: serves snapshots only, never calls upstream ---
    let state = AppState {
        store,
        cpu_alert_threshold: cfg.cpu_alert_threshold,
    };
    let router = create_router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    axum::serve(listener, router).await.context("serving http")?;

    Ok(())
}
