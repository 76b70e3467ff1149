//! # Error-Log Middleware
//!
//! Captures request context, runs the inner service, and for every error
//! response persists a derived [`crate::db::error_logs`] record. The
//! classified error travels in the response extensions (stashed by
//! [`crate::error::ApiError`]); the caller identity is stashed there by the
//! auth middleware.
//!
//! The write runs on a detached task: a slow or failed log write can never
//! delay or fail the client-visible response. Persistence failures are
//! reported to the diagnostic stream only. This is the one failure-
//! isolation contract in the system.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use campus_core::AppError;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::db::error_logs::NewErrorLog;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

/// Request context captured before the inner service consumes the request.
#[derive(Debug, Clone)]
struct RequestContext {
    method: String,
    url: String,
    user_agent: Option<String>,
    ip: Option<String>,
    request_id: String,
}

impl RequestContext {
    fn capture(request: &Request) -> Self {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        // First hop of x-forwarded-for; absent when not behind a proxy.
        let ip = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());

        Self {
            method: request.method().to_string(),
            url: request.uri().to_string(),
            user_agent,
            ip,
            request_id,
        }
    }
}

/// Persist a derived record of every error response.
pub async fn error_log_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::capture(&request);
    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        if let Some(err) = response.extensions().get::<AppError>() {
            let user_id = response
                .extensions()
                .get::<CallerIdentity>()
                .and_then(|caller| caller.user_id);

            let record = NewErrorLog {
                error_code: err.kind().as_str().to_string(),
                message: err.message().to_string(),
                stack_trace: None,
                severity: err.severity(),
                metadata: err.metadata().cloned(),
                user_id,
                request_id: ctx.request_id,
                user_agent: ctx.user_agent,
                ip: ctx.ip,
                url: Some(ctx.url),
                method: Some(ctx.method),
            };

            let pool = state.db.clone();
            tokio::spawn(async move {
                if let Err(e) = crate::db::error_logs::insert(&pool, record).await {
                    tracing::error!(error = %e, "failed to persist error log record");
                }
            });
        }
    }

    response
}
