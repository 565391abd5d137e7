//! Fxrates API Server
//!
//! Main entry point for the exchange rate resolution service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxrates_api::{AppState, create_router};
use fxrates_core::rates::{RateResolver, SnapshotCache};
use fxrates_provider::HttpRateProvider;
use fxrates_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxrates=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Create upstream provider client
    let provider = HttpRateProvider::new(&config.upstream)
        .map_err(|err| anyhow::anyhow!("failed to build upstream client: {err}"))?;
    info!(
        base_url = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "Upstream provider configured"
    );

    // Create rate resolver with its snapshot cache
    let cache = SnapshotCache::new(&config.cache);
    let resolver = RateResolver::new(Arc::new(provider), cache);
    info!(
        ttl_secs = config.cache.ttl_secs,
        max_bases = config.cache.max_bases,
        "Snapshot cache configured"
    );

    // Create application state
    let state = AppState {
        resolver: Arc::new(resolver),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
