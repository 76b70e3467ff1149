//! # Response Envelope
//!
//! Uniform wire shapes for every endpoint:
//!
//! - Success: `{ "success": true, "message": "...", "data": ... }`
//! - Error: `{ "success": false, "message": "...", "code"?, "details"? }`
//! - Paginated: `{ "success": true, "data": [...], "pagination": {...} }`
//!
//! Pagination computes `pages = ceil(total / limit)` and accepts `page` /
//! `limit` as numbers or numeric strings, parsed with truncation toward
//! zero. No bounds checking is applied: an out-of-range page returns
//! whatever the underlying query produced.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default message for successful responses.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Default message for error responses.
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal Server Error";

/// Successful response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap `data` with the default success message.
    pub fn ok(data: T) -> Self {
        Self::with_message(data, DEFAULT_SUCCESS_MESSAGE)
    }

    /// Wrap `data` with a custom message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Error response wrapper. `code` carries the taxonomy code; `details`
/// names the failing inputs and is present only for validation errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Build an error body with no code or details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: None,
            details: None,
        }
    }
}

/// Pagination block of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageMeta {
    /// Compute the page count: `ceil(total / limit)`, `0` when `total`
    /// or `limit` is not positive.
    pub fn compute(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit <= 0 || total <= 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Paginated success response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: PageMeta) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

/// Query parameters for paginated listings.
///
/// Both fields accept a number or a numeric string; fractional values are
/// truncated toward zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "flexible_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10)
    }

    /// Row offset for the underlying query. Clamped at zero so an
    /// out-of-range page yields an empty result rather than a SQL error.
    pub fn offset(&self) -> i64 {
        ((self.page() - 1) * self.limit()).max(0)
    }
}

/// Deserialize an optional integer from a number or a numeric string,
/// truncating toward zero.
fn flexible_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct FlexibleInt;

    impl<'de> serde::de::Visitor<'de> for FlexibleInt {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("an integer or a numeric string")
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as i64))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.trunc() as i64))
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(Some(n));
            }
            trimmed
                .parse::<f64>()
                .map(|f| Some(f.trunc() as i64))
                .map_err(|_| E::custom(format!("invalid numeric value: {v:?}")))
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: serde::Deserializer<'de>>(
            self,
            deserializer: D2,
        ) -> Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(FlexibleInt)
        }
    }

    deserializer.deserialize_any(FlexibleInt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let body = ApiResponse::ok(json!({"id": 1}));
        let rendered = serde_json::to_value(&body).unwrap();
        assert_eq!(rendered["success"], true);
        assert_eq!(rendered["message"], "Success");
        assert_eq!(rendered["data"]["id"], 1);
    }

    #[test]
    fn success_envelope_custom_message() {
        let body = ApiResponse::with_message((), "Student created");
        assert_eq!(body.message, "Student created");
        assert!(body.success);
    }

    #[test]
    fn error_envelope_omits_absent_fields() {
        let body = ErrorResponse::new(DEFAULT_ERROR_MESSAGE);
        let rendered = serde_json::to_string(&body).unwrap();
        assert!(rendered.contains("\"success\":false"));
        assert!(rendered.contains("Internal Server Error"));
        assert!(!rendered.contains("code"));
        assert!(!rendered.contains("details"));
    }

    #[test]
    fn pages_rounds_up() {
        assert_eq!(PageMeta::compute(1, 10, 95).pages, 10);
        assert_eq!(PageMeta::compute(1, 10, 100).pages, 10);
        assert_eq!(PageMeta::compute(1, 10, 101).pages, 11);
        assert_eq!(PageMeta::compute(1, 10, 1).pages, 1);
    }

    #[test]
    fn pages_zero_for_empty_total() {
        assert_eq!(PageMeta::compute(1, 10, 0).pages, 0);
    }

    #[test]
    fn pages_zero_for_nonpositive_limit() {
        assert_eq!(PageMeta::compute(1, 0, 50).pages, 0);
        assert_eq!(PageMeta::compute(1, -5, 50).pages, 0);
    }

    #[test]
    fn page_query_parses_numbers() {
        let q: PageQuery = serde_json::from_value(json!({"page": 2, "limit": 25})).unwrap();
        assert_eq!(q.page(), 2);
        assert_eq!(q.limit(), 25);
        assert_eq!(q.offset(), 25);
    }

    #[test]
    fn page_query_parses_numeric_strings() {
        let q: PageQuery = serde_json::from_value(json!({"page": "3", "limit": "10"})).unwrap();
        assert_eq!(q.page(), 3);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn page_query_truncates_toward_zero() {
        let q: PageQuery =
            serde_json::from_value(json!({"page": "2.9", "limit": "10.7"})).unwrap();
        assert_eq!(q.page(), 2);
        assert_eq!(q.limit(), 10);

        let q: PageQuery = serde_json::from_value(json!({"limit": "-3.9"})).unwrap();
        assert_eq!(q.limit.unwrap(), -3);
    }

    #[test]
    fn page_query_defaults() {
        let q: PageQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_query_rejects_garbage() {
        assert!(serde_json::from_value::<PageQuery>(json!({"page": "abc"})).is_err());
    }

    #[test]
    fn offset_clamped_for_nonpositive_page() {
        let q: PageQuery = serde_json::from_value(json!({"page": -2, "limit": 10})).unwrap();
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn paginated_envelope_shape() {
        let body = Paginated::new(vec![1, 2, 3], PageMeta::compute(1, 10, 3));
        let rendered = serde_json::to_value(&body).unwrap();
        assert_eq!(rendered["success"], true);
        assert_eq!(rendered["pagination"]["total"], 3);
        assert_eq!(rendered["pagination"]["pages"], 1);
        assert_eq!(rendered["data"].as_array().unwrap().len(), 3);
    }
}
