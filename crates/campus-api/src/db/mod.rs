//! # Database Layer
//!
//! Hand-written sqlx queries over Postgres. All functions take a `&PgPool`.
//! Referential and uniqueness constraints beyond natural keys are enforced
//! at the application layer, not in SQL.
//!
//! Schema management is out of scope for this crate; the expected tables
//! are:
//!
//! ```sql
//! users        (id UUID PK, email TEXT UNIQUE, full_name TEXT, role TEXT,
//!               password_salt TEXT, password_hash TEXT, created_at TIMESTAMPTZ)
//! students     (id UUID PK, student_number TEXT UNIQUE, first_name TEXT,
//!               last_name TEXT, email TEXT, user_id UUID NULL,
//!               created_at TIMESTAMPTZ, updated_at TIMESTAMPTZ)
//! courses      (id UUID PK, course_code TEXT UNIQUE, title TEXT,
//!               description TEXT NULL, credits INT,
//!               created_at TIMESTAMPTZ, updated_at TIMESTAMPTZ)
//! enrollments  (id UUID PK, student_id UUID, course_id UUID, status TEXT,
//!               grade TEXT NULL, enrolled_at TIMESTAMPTZ, updated_at TIMESTAMPTZ)
//! error_logs   (id UUID PK, error_code TEXT, message TEXT,
//!               stack_trace TEXT NULL, severity TEXT CHECK (severity IN
//!               ('info','warning','error','critical')), metadata JSONB NULL,
//!               user_id UUID NULL, request_id TEXT, user_agent TEXT NULL,
//!               ip TEXT NULL, url TEXT NULL, method TEXT NULL,
//!               created_at TIMESTAMPTZ)
//! ```

pub mod courses;
pub mod enrollments;
pub mod error_logs;
pub mod students;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Build a lazy connection pool.
///
/// Connections are established on first use, so the process starts without
/// a reachable database; queries that then fail surface through the error
/// pipeline as technical errors.
pub fn connect_lazy(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url)
}
