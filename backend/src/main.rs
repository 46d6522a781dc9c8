//! TropoMetrics - Backend Server
//!
//! HTTP service exposing the weather report and email relay endpoints.

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tropometrics_backend::{config::Config, create_app, AppState, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting TropoMetrics Server");
    tracing::info!("Environment: {}", config.environment);

    if config.smtp.is_configured() {
        tracing::info!(
            "Email relay configured via {}:{}",
            config.smtp.host(),
            config.smtp.port()
        );
    } else {
        tracing::warn!("Email credentials not configured; mail routes will return 503");
    }

    // Create application state
    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host: {}", config.server.host))?;
    let port = config.server.port;
    let state = AppState::from_config(config)?;

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::new(host, port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
