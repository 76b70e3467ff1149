//! # campus-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Campus Stack API.
//! Binds to configurable port (default 8080).

use campus_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/campus".to_string());

    let auth_secret = std::env::var("AUTH_SECRET").ok();
    if auth_secret.is_none() {
        tracing::warn!(
            "AUTH_SECRET not set — authentication is disabled and every \
             request runs as admin. Do not deploy this configuration."
        );
    }

    let config = AppConfig {
        port,
        database_url,
        auth_secret,
    };

    let state = AppState::new(config).map_err(|e| {
        tracing::error!("Database pool initialization failed: {e}");
        e
    })?;

    let app = campus_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Campus API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
