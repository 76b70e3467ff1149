//! # campus-core — Foundational Types for the Campus Stack
//!
//! Domain-level building blocks shared by every Campus Stack crate:
//!
//! - [`error`] — the error taxonomy ([`ErrorKind`], [`ErrorSeverity`]) and
//!   the classified error value ([`AppError`]) that flows from the point a
//!   failure is detected to the API boundary.
//! - [`sanitize`] — masking of sensitive keys in arbitrary JSON metadata
//!   before it is logged or persisted.
//! - [`domain`] — validated domain-primitive newtypes (email addresses,
//!   student numbers, course codes).
//!
//! This crate is deliberately free of web-framework and database
//! dependencies; the API layer adapts these types to the wire.

pub mod domain;
pub mod error;
pub mod sanitize;

pub use error::{AppError, ErrorKind, ErrorSeverity};
pub use sanitize::sanitize;
