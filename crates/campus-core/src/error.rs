//! # Error Taxonomy & Classified Error Values
//!
//! Every failure in the Campus Stack is classified into one of five kinds
//! with a fixed wire code and a default HTTP status. [`AppError`] is a single
//! concrete value type with a `kind` discriminant; variants are produced by
//! factory constructors, not subtypes. `kind` and `status` are pinned at
//! construction: `with_status` consumes `self` and there is no setter for
//! `kind`, so a classified error cannot be re-classified downstream.
//!
//! Errors are transient control-flow values: created where the failure is
//! detected, consumed exactly once at the API boundary, never persisted
//! directly (only a derived log record is).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failure.
///
/// The wire code and the default HTTP status are pure functions of the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input failed field-level validation (400).
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// A domain rule was violated (400).
    #[serde(rename = "BUSINESS_ERROR")]
    Business,
    /// Authentication or authorization denial (403).
    #[serde(rename = "SECURITY_ERROR")]
    Security,
    /// Infrastructure failure: database, I/O, downstream service (500).
    #[serde(rename = "TECHNICAL_ERROR")]
    Technical,
    /// Unclassified failure wrapped at the boundary (500).
    #[serde(rename = "INTERNAL_SERVER_ERROR")]
    Internal,
}

impl ErrorKind {
    /// Return the machine-readable wire code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Business => "BUSINESS_ERROR",
            Self::Security => "SECURITY_ERROR",
            Self::Technical => "TECHNICAL_ERROR",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Default HTTP status for this kind. Overridable per instance at
    /// construction via [`AppError::with_status`].
    pub fn default_status(&self) -> u16 {
        match self {
            Self::Validation | Self::Business => 400,
            Self::Security => 403,
            Self::Technical | Self::Internal => 500,
        }
    }

    /// Default severity for this kind.
    fn default_severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation | Self::Business => ErrorSeverity::Warning,
            Self::Security | Self::Technical | Self::Internal => ErrorSeverity::Error,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a failure, ordered by escalation.
///
/// The `Ord` derivation respects variant declaration order:
/// `Info < Warning < Error < Critical`. Severity drives logging and alerting
/// priority, never the HTTP status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl ErrorSeverity {
    /// Return the string representation of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A classified failure.
///
/// Constructed via the per-kind factories ([`AppError::validation`],
/// [`AppError::business`], [`AppError::security`], [`AppError::technical`],
/// [`AppError::internal`]); the message must be non-empty. `metadata` carries
/// arbitrary diagnostic payload destined for the error log (sanitized before
/// persistence); `context` carries request-scoped key-value context;
/// `details` names the inputs that failed validation and is the only
/// auxiliary field that may reach the client.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    severity: ErrorSeverity,
    status: u16,
    details: Option<serde_json::Value>,
    metadata: Option<serde_json::Value>,
    context: Option<serde_json::Value>,
}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(
            !message.trim().is_empty(),
            "error message must be non-empty"
        );
        Self {
            severity: kind.default_severity(),
            status: kind.default_status(),
            kind,
            message,
            details: None,
            metadata: None,
            context: None,
        }
    }

    /// Input failed field-level validation (400).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// A domain rule was violated (400).
    pub fn business(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Business, message)
    }

    /// Authentication or authorization denial (403).
    pub fn security(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Security, message)
    }

    /// Infrastructure failure (500).
    pub fn technical(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Technical, message)
    }

    /// Unclassified failure wrapped at the boundary (500).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Override the HTTP status. Construction-time only; consumes `self`.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Override the default severity for this kind.
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach a client-visible description of which inputs failed.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach diagnostic metadata. Sanitized before any persistence.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attach request-scoped context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    pub fn context(&self) -> Option<&serde_json::Value> {
        self.context.as_ref()
    }

    /// Whether this error maps to a 5xx response. Server-class errors never
    /// surface their message or metadata beyond a generic fallback.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Convert domain-primitive validation failures into classified errors.
impl From<crate::domain::ValidationError> for AppError {
    fn from(err: crate::domain::ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_wire_codes() {
        assert_eq!(ErrorKind::Validation.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorKind::Business.as_str(), "BUSINESS_ERROR");
        assert_eq!(ErrorKind::Security.as_str(), "SECURITY_ERROR");
        assert_eq!(ErrorKind::Technical.as_str(), "TECHNICAL_ERROR");
        assert_eq!(ErrorKind::Internal.as_str(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn kind_default_status_mapping() {
        assert_eq!(ErrorKind::Validation.default_status(), 400);
        assert_eq!(ErrorKind::Business.default_status(), 400);
        assert_eq!(ErrorKind::Security.default_status(), 403);
        assert_eq!(ErrorKind::Technical.default_status(), 500);
        assert_eq!(ErrorKind::Internal.default_status(), 500);
    }

    #[test]
    fn kind_serializes_to_wire_code() {
        let json = serde_json::to_string(&ErrorKind::Internal).unwrap();
        assert_eq!(json, "\"INTERNAL_SERVER_ERROR\"");
        let back: ErrorKind = serde_json::from_str("\"VALIDATION_ERROR\"").unwrap();
        assert_eq!(back, ErrorKind::Validation);
    }

    #[test]
    fn severity_ordering_is_escalation_order() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn severity_roundtrips_through_str() {
        for severity in [
            ErrorSeverity::Info,
            ErrorSeverity::Warning,
            ErrorSeverity::Error,
            ErrorSeverity::Critical,
        ] {
            let parsed: ErrorSeverity = severity.as_str().parse().unwrap();
            assert_eq!(parsed, severity);
        }
        assert!("fatal".parse::<ErrorSeverity>().is_err());
    }

    #[test]
    fn validation_factory_defaults() {
        let err = AppError::validation("name must not be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status(), 400);
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.details().is_none());
        assert!(err.metadata().is_none());
    }

    #[test]
    fn business_factory_defaults() {
        let err = AppError::business("student already enrolled");
        assert_eq!(err.kind(), ErrorKind::Business);
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn security_factory_defaults() {
        let err = AppError::security("insufficient role");
        assert_eq!(err.kind(), ErrorKind::Security);
        assert_eq!(err.status(), 403);
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn technical_factory_defaults() {
        let err = AppError::technical("database operation failed");
        assert_eq!(err.kind(), ErrorKind::Technical);
        assert_eq!(err.status(), 500);
        assert!(err.is_server_error());
    }

    #[test]
    fn internal_factory_defaults() {
        let err = AppError::internal("Internal Server Error");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.status(), 500);
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn with_status_overrides_default() {
        let err = AppError::business("student not found").with_status(404);
        assert_eq!(err.kind(), ErrorKind::Business);
        assert_eq!(err.status(), 404);
        assert!(!err.is_server_error());
    }

    #[test]
    fn with_metadata_and_context_preserved_unchanged() {
        let metadata = json!({"attempt": 3, "table": "students"});
        let context = json!({"route": "/v1/students"});
        let err = AppError::technical("insert failed")
            .with_metadata(metadata.clone())
            .with_context(context.clone());
        assert_eq!(err.metadata(), Some(&metadata));
        assert_eq!(err.context(), Some(&context));
    }

    #[test]
    fn with_details_preserved() {
        let details = json!({"email": "must contain '@'"});
        let err = AppError::validation("invalid input").with_details(details.clone());
        assert_eq!(err.details(), Some(&details));
    }

    #[test]
    fn with_severity_overrides_default() {
        let err = AppError::security("token replay detected")
            .with_severity(ErrorSeverity::Critical);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = AppError::validation("email is malformed");
        let rendered = format!("{err}");
        assert!(rendered.contains("VALIDATION_ERROR"));
        assert!(rendered.contains("email is malformed"));
    }

    #[test]
    fn validation_error_converts_to_validation_kind() {
        let domain_err = crate::domain::ValidationError::InvalidEmail("nope".to_string());
        let err = AppError::from(domain_err);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("nope"));
    }
}
