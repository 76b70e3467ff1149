//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. The state is one immutable service value built at
//! process start and handed to every request-handling entry point; there is
//! no lazily-initialized global.
//!
//! The only cross-request resource is the sqlx connection pool; the pool
//! owns its own concurrency, so `AppState` holds no per-request mutable
//! state and is freely cloneable.

use sqlx::PgPool;

/// Application configuration.
///
/// Custom `Debug` redacts `database_url` (it may embed credentials) and
/// `auth_secret` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Shared secret for bearer tokens.
    /// If `None`, authentication is disabled (development mode).
    pub auth_secret: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &"[REDACTED]")
            .field(
                "auth_secret",
                &self.auth_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: "postgres://localhost/campus".to_string(),
            auth_secret: None,
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: `PgPool` is an `Arc` around the actual pool.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Postgres connection pool. Built lazily, so the process starts
    /// without a reachable database; queries that then fail surface
    /// through the error pipeline as technical errors.
    pub db: PgPool,
    pub config: AppConfig,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Returns `Err` only if the database URL cannot be parsed; no
    /// connection is attempted until the first query.
    pub fn new(config: AppConfig) -> Result<Self, sqlx::Error> {
        let db = crate::db::connect_lazy(&config.database_url)?;
        Ok(Self { db, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_debug_redacts_secrets() {
        let config = AppConfig {
            port: 3000,
            database_url: "postgres://user:hunter2@db/campus".to_string(),
            auth_secret: Some("top-secret".to_string()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("3000"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn config_default_has_auth_disabled() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert!(config.auth_secret.is_none());
    }

    #[tokio::test]
    async fn state_builds_without_live_database() {
        let state = AppState::new(AppConfig::default()).unwrap();
        assert_eq!(state.config.port, 8080);
    }

    #[test]
    fn state_rejects_unparseable_url() {
        let config = AppConfig {
            database_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(AppState::new(config).is_err());
    }
}
