//! # Middleware Stack
//!
//! - [`request_id`] — correlation-id propagation (`x-request-id`).
//! - [`error_log`] — persists a derived record of every error response
//!   without touching the response path.
//! - [`tracing_layer`] — structured request/response tracing.

pub mod error_log;
pub mod request_id;
pub mod tracing_layer;
