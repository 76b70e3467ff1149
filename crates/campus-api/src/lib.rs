//! # campus-api — Axum REST API for the Campus Stack
//!
//! Request-response glue over Postgres: authentication, student / course /
//! enrollment records, and the centralized error pipeline that classifies
//! every failure, normalizes the wire response, and persists a sanitized
//! log record.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                   | Access        |
//! |-------------------------|--------------------------|---------------|
//! | `/v1/auth/login`        | [`routes::auth`]         | public        |
//! | `/v1/auth/*`            | [`routes::auth`]         | authenticated |
//! | `/v1/students/*`        | [`routes::students`]     | role-gated    |
//! | `/v1/courses/*`         | [`routes::courses`]      | role-gated    |
//! | `/v1/enrollments/*`     | [`routes::enrollments`]  | Staff         |
//! | `/v1/admin/*`           | [`routes::admin`]        | Admin         |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → RequestId → ErrorLog → Auth → Handler
//! ```
//!
//! The error-log middleware sits outside auth so that authentication
//! failures are recorded too; the correlation id sits outside the error
//! log so every record carries one.

pub mod auth;
pub mod db;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and login are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        secret: state.config.auth_secret.clone(),
    };

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::auth::router())
        .merge(routes::students::router())
        .merge(routes::courses::router())
        .merge(routes::enrollments::router())
        .merge(routes::admin::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware));

    // Unauthenticated surface: health probes and login.
    let public = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .merge(routes::auth::public_router());

    Router::new()
        .merge(public)
        .merge(api)
        .with_state(state.clone())
        .layer(from_fn_with_state(
            state,
            middleware::error_log::error_log_middleware,
        ))
        .layer(from_fn(middleware::request_id::request_id_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
