//! Error-log persistence — append-only record of error occurrences.
//!
//! One row per logged error: the taxonomy code, message, severity, request
//! context, and sanitized metadata. Rows are never mutated after creation
//! and are retained indefinitely. Metadata passes through the sanitizer
//! here, immediately before storage, so no unsanitized payload can reach
//! the table regardless of the caller.

use campus_core::ErrorSeverity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// An error occurrence to be persisted.
#[derive(Debug, Clone)]
pub struct NewErrorLog {
    pub error_code: String,
    pub message: String,
    pub stack_trace: Option<String>,
    pub severity: ErrorSeverity,
    /// Diagnostic payload; sanitized before storage.
    pub metadata: Option<serde_json::Value>,
    pub user_id: Option<Uuid>,
    pub request_id: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
}

/// Append an error-log row. Returns the generated row id.
pub async fn insert(pool: &PgPool, log: NewErrorLog) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let metadata = log.metadata.as_ref().map(campus_core::sanitize);

    sqlx::query(
        "INSERT INTO error_logs (id, error_code, message, stack_trace, severity, metadata,
         user_id, request_id, user_agent, ip, url, method, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW())",
    )
    .bind(id)
    .bind(&log.error_code)
    .bind(&log.message)
    .bind(&log.stack_trace)
    .bind(log.severity.as_str())
    .bind(metadata)
    .bind(log.user_id)
    .bind(&log.request_id)
    .bind(&log.user_agent)
    .bind(&log.ip)
    .bind(&log.url)
    .bind(&log.method)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Query the most recent error-log rows.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ErrorLogRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ErrorLogRow>(
        "SELECT id, error_code, message, stack_trace, severity, metadata,
         user_id, request_id, user_agent, ip, url, method, created_at
         FROM error_logs ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ErrorLogRow::into_record).collect())
}

/// A persisted error-log row, with the severity parsed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorLogRecord {
    pub id: Uuid,
    pub error_code: String,
    pub message: String,
    pub stack_trace: Option<String>,
    #[schema(value_type = String)]
    pub severity: ErrorSeverity,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub user_id: Option<Uuid>,
    pub request_id: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct ErrorLogRow {
    id: Uuid,
    error_code: String,
    message: String,
    stack_trace: Option<String>,
    severity: String,
    metadata: Option<serde_json::Value>,
    user_id: Option<Uuid>,
    request_id: String,
    user_agent: Option<String>,
    ip: Option<String>,
    url: Option<String>,
    method: Option<String>,
    created_at: DateTime<Utc>,
}

impl ErrorLogRow {
    fn into_record(self) -> ErrorLogRecord {
        // READ path: the severity column carries a CHECK constraint, so an
        // unknown value means manual tampering; default to `error` and log.
        let severity: ErrorSeverity = self.severity.parse().unwrap_or_else(|e| {
            tracing::error!(
                id = %self.id,
                severity = %self.severity,
                error = %e,
                "unknown severity in error_logs — defaulting to error; investigate"
            );
            ErrorSeverity::Error
        });

        ErrorLogRecord {
            id: self.id,
            error_code: self.error_code,
            message: self.message,
            stack_trace: self.stack_trace,
            severity,
            metadata: self.metadata,
            user_id: self.user_id,
            request_id: self.request_id,
            user_agent: self.user_agent,
            ip: self.ip,
            url: self.url,
            method: self.method,
            created_at: self.created_at,
        }
    }
}
