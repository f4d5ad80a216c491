use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use seer_api::{app, AppState};
use seer_store::{init_bridge, Config, HttpUpstreamClient, InMemoryEventCache};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local wins over .env; neither overrides the real environment
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seer_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    let reporters = init_bridge(&config.reporting).context("Failed to initialize error reporting")?;
    tracing::info!("Reporters: {:?}", reporters);

    let upstream = HttpUpstreamClient::new(&config.upstream).context("Failed to build HTTP client")?;
    let port = config.server.port;

    let app_state = AppState::new(
        config,
        reporters.clone(),
        Arc::new(upstream),
        Arc::new(InMemoryEventCache::new()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting Seer playground on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if !reporters.flush(Duration::from_secs(2)) {
        tracing::warn!("Timed out flushing error reports");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
