//! # Domain-Primitive Newtypes
//!
//! Validated-at-construction value types for identifiers that flow through
//! the API. Each type enforces its format in `new`; the errors carry the
//! rejected input and the expected format so operators can diagnose bad
//! requests without guesswork.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for domain primitives.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Email fails the structural check (non-empty local part and domain).
    #[error("invalid email address: \"{0}\" (expected local@domain)")]
    InvalidEmail(String),

    /// Student number is empty, too long, or contains invalid characters.
    #[error("invalid student number: \"{0}\" (expected 1-32 alphanumeric or dash characters)")]
    InvalidStudentNumber(String),

    /// Course code is empty, too long, or contains invalid characters.
    #[error("invalid course code: \"{0}\" (expected 1-16 alphanumeric or dash characters)")]
    InvalidCourseCode(String),
}

/// A structurally valid email address.
///
/// Serializes as a plain string. This is a shape check only; deliverability
/// is not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a validated email address.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        let valid = trimmed.len() <= 254
            && trimmed
                .split_once('@')
                .is_some_and(|(local, domain)| {
                    !local.is_empty() && !domain.is_empty() && !domain.starts_with('.')
                });
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidEmail(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registrar-issued student number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentNumber(String);

impl StudentNumber {
    /// Create a validated student number.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= 32
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidStudentNumber(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A course catalog code, stored uppercase (e.g. `CS-210`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(String);

impl CourseCode {
    /// Create a validated course code. Input is uppercased.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= 16
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if valid {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(ValidationError::InvalidCourseCode(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
