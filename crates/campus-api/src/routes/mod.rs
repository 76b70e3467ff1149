//! # API Route Modules
//!
//! - `auth` — login (public), identity echo, account registration.
//! - `students` — student record CRUD with paginated listing.
//! - `courses` — course catalog CRUD with paginated listing.
//! - `enrollments` — enrollment lifecycle (enroll, grade, drop) and
//!   per-student / per-course listings.
//! - `admin` — operator read-back of persisted error logs.

pub mod admin;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod students;
