//! Course persistence operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Course record (API-layer representation).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CourseRecord {
    pub id: Uuid,
    /// Catalog code, uppercase (e.g. `CS-210`).
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for course creation.
pub struct NewCourse {
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
}

/// Optional fields for course updates; `None` leaves the column unchanged.
pub struct CourseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
}

/// Insert a new course. Fails on duplicate course code.
pub async fn insert(pool: &PgPool, new: &NewCourse) -> Result<CourseRecord, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO courses (id, course_code, title, description, credits, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $6)",
    )
    .bind(id)
    .bind(&new.course_code)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.credits)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(CourseRecord {
        id,
        course_code: new.course_code.clone(),
        title: new.title.clone(),
        description: new.description.clone(),
        credits: new.credits,
        created_at: now,
        updated_at: now,
    })
}

/// Fetch a course by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CourseRecord>, sqlx::Error> {
    sqlx::query_as::<_, CourseRecord>(
        "SELECT id, course_code, title, description, credits, created_at, updated_at
         FROM courses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List courses with pagination, by catalog code.
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<CourseRecord>, sqlx::Error> {
    sqlx::query_as::<_, CourseRecord>(
        "SELECT id, course_code, title, description, credits, created_at, updated_at
         FROM courses ORDER BY course_code LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Total number of courses.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(pool)
        .await
}

/// Apply partial changes to a course. Returns the updated record, or
/// `None` if the course does not exist.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &CourseChanges,
) -> Result<Option<CourseRecord>, sqlx::Error> {
    sqlx::query_as::<_, CourseRecord>(
        "UPDATE courses
         SET title       = COALESCE($2, title),
             description = COALESCE($3, description),
             credits     = COALESCE($4, credits),
             updated_at  = NOW()
         WHERE id = $1
         RETURNING id, course_code, title, description, credits, created_at, updated_at",
    )
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.credits)
    .fetch_optional(pool)
    .await
}

/// Delete a course. Returns `true` if a row was removed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
