//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies in handlers. Validation failures are reported
//! per field and surface as a validation error whose `details` payload
//! names the failing inputs.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use campus_core::AppError;

use crate::error::ApiError;

/// A single failed field in a request body.
#[derive(Debug)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trait for request types that validate their fields beyond what serde
/// deserialization checks. An empty vector means the value is valid.
pub trait Validate {
    fn validate(&self) -> Vec<FieldError>;
}

/// Extract a JSON body, mapping deserialization errors to a 400
/// validation error.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::validation(err.body_text()).into())
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
///
/// Field failures are collected into the error's `details` payload
/// (`{"field": "message", ...}`).
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    let value = extract_json(result)?;
    let failures = value.validate();
    if failures.is_empty() {
        return Ok(value);
    }
    let details: serde_json::Map<String, serde_json::Value> = failures
        .into_iter()
        .map(|f| (f.field.to_string(), serde_json::Value::String(f.message)))
        .collect();
    Err(AppError::validation("request validation failed")
        .with_details(serde_json::Value::Object(details))
        .into())
}
