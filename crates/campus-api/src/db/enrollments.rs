//! Enrollment persistence operations.
//!
//! Enrollment lifecycle constraints (no duplicate active enrollment, drop
//! semantics) are enforced at the application layer, not in SQL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Enrollment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Active enrollment.
    Enrolled,
    /// Dropped by the student or staff; kept for the transcript.
    Dropped,
    /// Finished with a recorded grade.
    Completed,
}

impl EnrollmentStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "ENROLLED",
            Self::Dropped => "DROPPED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENROLLED" => Ok(Self::Enrolled),
            "DROPPED" => Ok(Self::Dropped),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(format!("unknown enrollment status: {other}")),
        }
    }
}

/// Enrollment record (API-layer representation).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    /// Recorded grade, present once the enrollment is completed.
    pub grade: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert a new active enrollment.
pub async fn insert(
    pool: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<EnrollmentRecord, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO enrollments (id, student_id, course_id, status, grade, enrolled_at, updated_at)
         VALUES ($1, $2, $3, $4, NULL, $5, $5)",
    )
    .bind(id)
    .bind(student_id)
    .bind(course_id)
    .bind(EnrollmentStatus::Enrolled.as_str())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(EnrollmentRecord {
        id,
        student_id,
        course_id,
        status: EnrollmentStatus::Enrolled,
        grade: None,
        enrolled_at: now,
        updated_at: now,
    })
}

/// Whether the student has a non-dropped enrollment in the course.
pub async fn active_exists(
    pool: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(
             SELECT 1 FROM enrollments
             WHERE student_id = $1 AND course_id = $2 AND status != 'DROPPED'
         )",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}

/// Fetch an enrollment by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<EnrollmentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, EnrollmentRow>(
        "SELECT id, student_id, course_id, status, grade, enrolled_at, updated_at
         FROM enrollments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(EnrollmentRow::into_record))
}

/// List a student's enrollments, newest first.
pub async fn list_for_student(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<EnrollmentRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EnrollmentRow>(
        "SELECT id, student_id, course_id, status, grade, enrolled_at, updated_at
         FROM enrollments WHERE student_id = $1 ORDER BY enrolled_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(EnrollmentRow::into_record).collect())
}

/// List a course's enrollments, newest first.
pub async fn list_for_course(
    pool: &PgPool,
    course_id: Uuid,
) -> Result<Vec<EnrollmentRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EnrollmentRow>(
        "SELECT id, student_id, course_id, status, grade, enrolled_at, updated_at
         FROM enrollments WHERE course_id = $1 ORDER BY enrolled_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(EnrollmentRow::into_record).collect())
}

/// Record a grade and mark the enrollment completed. Returns the updated
/// record, or `None` if the enrollment does not exist.
pub async fn record_grade(
    pool: &PgPool,
    id: Uuid,
    grade: &str,
) -> Result<Option<EnrollmentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, EnrollmentRow>(
        "UPDATE enrollments
         SET grade = $2, status = 'COMPLETED', updated_at = NOW()
         WHERE id = $1
         RETURNING id, student_id, course_id, status, grade, enrolled_at, updated_at",
    )
    .bind(id)
    .bind(grade)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(EnrollmentRow::into_record))
}

/// Mark an enrollment dropped. The row is kept for the transcript.
/// Returns the updated record, or `None` if the enrollment does not exist.
pub async fn drop_enrollment(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<EnrollmentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, EnrollmentRow>(
        "UPDATE enrollments
         SET status = 'DROPPED', updated_at = NOW()
         WHERE id = $1
         RETURNING id, student_id, course_id, status, grade, enrolled_at, updated_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(EnrollmentRow::into_record))
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    status: String,
    grade: Option<String>,
    enrolled_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EnrollmentRow {
    fn into_record(self) -> EnrollmentRecord {
        // READ path: an unknown status in the database defaults to
        // ENROLLED, logged at ERROR because it may indicate prior data
        // corruption. The write path only ever stores known statuses.
        let status: EnrollmentStatus = self.status.parse().unwrap_or_else(|e| {
            tracing::error!(
                id = %self.id,
                status = %self.status,
                error = %e,
                "unknown enrollment status in database — defaulting to ENROLLED; investigate"
            );
            EnrollmentStatus::Enrolled
        });

        EnrollmentRecord {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            status,
            grade: self.grade,
            enrolled_at: self.enrolled_at,
            updated_at: self.updated_at,
        }
    }
}
