//! RSGuide Gateway - an HTTP gateway over RuneScape community data
//!
//! Fronts the RuneMetrics API, the hiscores ranking, the Treasure Hunter
//! poll, and an R2 image bucket with a uniform JSON API.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod pagination;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use upstream::{HttpFetcher, ObjectStore, R2Store};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the upstream fetcher and, when configured, the R2 store
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rsguide_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RSGuide Gateway");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, vote_ttl={}s, highscores_ttl={}s, player_ttl={}s, xp_ttl={}s",
        config.server_port, config.vote_ttl, config.highscores_ttl, config.player_ttl, config.xp_ttl
    );

    if config.api_key.is_none() {
        warn!("API_KEY is not set; image endpoints will reject all requests");
    }

    // Build collaborators
    let fetcher = Arc::new(HttpFetcher::new());
    let store: Option<Arc<dyn ObjectStore>> = match &config.storage {
        Some(storage) => {
            info!("Object storage configured for bucket '{}'", storage.bucket);
            Some(Arc::new(R2Store::new(storage)))
        }
        None => {
            warn!("Object storage is not configured; image endpoints will return errors");
            None
        }
    };

    let port = config.server_port;
    let state = AppState::new(config, fetcher, store);

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
