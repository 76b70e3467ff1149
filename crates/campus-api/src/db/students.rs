//! Student persistence operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Student record (API-layer representation).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct StudentRecord {
    pub id: Uuid,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// The account that owns this record. Used for access checks.
    /// `None` for records not linked to an account.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for student creation.
pub struct NewStudent {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_id: Option<Uuid>,
}

/// Optional fields for student updates; `None` leaves the column unchanged.
pub struct StudentChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Insert a new student. Fails on duplicate student number.
pub async fn insert(pool: &PgPool, new: &NewStudent) -> Result<StudentRecord, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO students (id, student_number, first_name, last_name, email, user_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
    )
    .bind(id)
    .bind(&new.student_number)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(new.user_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(StudentRecord {
        id,
        student_number: new.student_number.clone(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        email: new.email.clone(),
        user_id: new.user_id,
        created_at: now,
        updated_at: now,
    })
}

/// Fetch a student by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<StudentRecord>, sqlx::Error> {
    sqlx::query_as::<_, StudentRecord>(
        "SELECT id, student_number, first_name, last_name, email, user_id, created_at, updated_at
         FROM students WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List students with pagination, newest first.
pub async fn list(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<StudentRecord>, sqlx::Error> {
    sqlx::query_as::<_, StudentRecord>(
        "SELECT id, student_number, first_name, last_name, email, user_id, created_at, updated_at
         FROM students ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Total number of students.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await
}

/// Apply partial changes to a student. Returns the updated record, or
/// `None` if the student does not exist.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &StudentChanges,
) -> Result<Option<StudentRecord>, sqlx::Error> {
    sqlx::query_as::<_, StudentRecord>(
        "UPDATE students
         SET first_name = COALESCE($2, first_name),
             last_name  = COALESCE($3, last_name),
             email      = COALESCE($4, email),
             updated_at = NOW()
         WHERE id = $1
         RETURNING id, student_number, first_name, last_name, email, user_id, created_at, updated_at",
    )
    .bind(id)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.email)
    .fetch_optional(pool)
    .await
}

/// Delete a student. Returns `true` if a row was removed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
