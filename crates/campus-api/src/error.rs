//! # API Error Handler
//!
//! [`ApiError`] is the single exit point for every failure surfaced during
//! request handling. Already-classified [`AppError`] values pass through
//! unchanged; anything else (`anyhow::Error`, `sqlx::Error`, body
//! rejections) is wrapped at the boundary after a diagnostic event that
//! preserves the raw cause chain.
//!
//! Policy: the raw message of an unclassified failure is never sent to the
//! client; the wire message is the fixed `"Internal Server Error"`
//! fallback. Classified errors are constructed with client-safe messages
//! and pass them through.
//!
//! `into_response` never panics: if envelope serialization ever fails, a
//! constant minimal 500 body is returned with no further processing. The
//! classified error is stashed in the response extensions so the logging
//! middleware can persist a derived record.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use campus_core::{AppError, ErrorSeverity};

use crate::envelope::{ErrorResponse, DEFAULT_ERROR_MESSAGE};

/// Handler result alias used by all routes.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wire-level wrapper around a classified [`AppError`].
#[derive(Debug)]
pub struct ApiError(AppError);

impl ApiError {
    pub fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Wrap an unclassified failure. The diagnostic event is emitted before
/// the failure is flattened into a generic internal error, so the cause
/// chain survives for operators.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "unclassified failure reached the API boundary");
        Self(
            AppError::internal(DEFAULT_ERROR_MESSAGE)
                .with_metadata(serde_json::json!({ "cause": format!("{err:#}") })),
        )
    }
}

/// Database failures are technical errors. The raw driver message goes to
/// the diagnostic stream and the log record, never to the client.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "database operation failed");
        Self(
            AppError::technical("database operation failed")
                .with_metadata(serde_json::json!({ "cause": err.to_string() })),
        )
    }
}

/// Map a unique-constraint violation to a business conflict; anything else
/// stays a technical error. Used by insert paths that enforce natural keys.
pub fn on_unique_violation(err: sqlx::Error, message: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError(AppError::business(message).with_status(409))
        }
        _ => ApiError::from(err),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::error!(
                code = err.kind().as_str(),
                status = status.as_u16(),
                message = err.message(),
                "request failed"
            ),
            ErrorSeverity::Warning => tracing::warn!(
                code = err.kind().as_str(),
                status = status.as_u16(),
                message = err.message(),
                "request rejected"
            ),
            ErrorSeverity::Info => tracing::info!(
                code = err.kind().as_str(),
                status = status.as_u16(),
                message = err.message(),
                "request rejected"
            ),
        }

        let body = ErrorResponse {
            success: false,
            message: err.message().to_string(),
            code: Some(err.kind().as_str().to_string()),
            details: err.details().cloned(),
        };

        let mut response = match serde_json::to_vec(&body) {
            Ok(bytes) => Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(bytes))
                .unwrap_or_else(|_| fallback_response()),
            Err(_) => fallback_response(),
        };

        response.extensions_mut().insert(err);
        response
    }
}

/// Minimal fixed 500 used when response formatting itself fails.
const FALLBACK_BODY: &str = r#"{"success":false,"message":"Internal Server Error"}"#;

fn fallback_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        FALLBACK_BODY,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::ErrorKind;
    use http_body_util::BodyExt;

    async fn response_parts(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn classified_error_passes_status_and_message_through() {
        let err = ApiError::from(
            campus_core::AppError::business("student 42 not found").with_status(404),
        );
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "student 42 not found");
        assert_eq!(body["code"], "BUSINESS_ERROR");
    }

    #[tokio::test]
    async fn validation_error_carries_details() {
        let err = ApiError::from(
            campus_core::AppError::validation("request validation failed")
                .with_details(serde_json::json!({"email": "must contain '@'"})),
        );
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["email"], "must contain '@'");
    }

    #[tokio::test]
    async fn unclassified_failure_is_suppressed() {
        // Pins the wrapping policy: the raw internal message must not leak.
        let err = ApiError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.inner().kind(), ErrorKind::Internal);

        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
        assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
        assert!(
            !body.to_string().contains("boom"),
            "raw internal message must not leak: {body}"
        );
    }

    #[tokio::test]
    async fn unclassified_failure_keeps_cause_in_metadata() {
        // The cause chain survives for the log record even though the
        // client sees only the generic message.
        let err = ApiError::from(anyhow::anyhow!("boom"));
        let cause = err.inner().metadata().unwrap()["cause"].as_str().unwrap();
        assert!(cause.contains("boom"));
    }

    #[tokio::test]
    async fn sqlx_error_becomes_technical() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.inner().kind(), ErrorKind::Technical);

        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "TECHNICAL_ERROR");
        assert_eq!(body["message"], "database operation failed");
    }

    #[tokio::test]
    async fn classified_error_is_stashed_in_response_extensions() {
        let err = ApiError::from(campus_core::AppError::security("insufficient role"));
        let response = err.into_response();
        let stashed = response
            .extensions()
            .get::<campus_core::AppError>()
            .expect("AppError stashed for the logging middleware");
        assert_eq!(stashed.kind(), ErrorKind::Security);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn fallback_body_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(FALLBACK_BODY).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn fallback_response_is_minimal_500() {
        let response = fallback_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], FALLBACK_BODY.as_bytes());
    }
}
