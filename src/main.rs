use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fintrack_api::app::{router, AppState};
use fintrack_api::auth::TokenVerifier;
use fintrack_api::config::config;
use fintrack_api::database::DatabaseManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting FinTrack API in {:?} mode", config.environment);
    if fintrack_api::is_development!() {
        tracing::debug!("Configuration: {}", serde_json::to_string(config).unwrap_or_default());
    }
    if fintrack_api::is_production!() && config.security.cors_origins.is_empty() {
        tracing::warn!("No CORS origins configured; browser clients will be rejected");
    }

    let verifier = TokenVerifier::new(&config.security.jwt_secret)
        .context("JWT_SECRET must be set")?
        .with_expiry_enforcement(config.security.enforce_token_expiry);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Database connection established");

    let state = AppState::new(pool, verifier, config.api.clone());
    let app = router(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("FinTrack API listening on http://{}{}", bind_addr, config.api_prefix());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
