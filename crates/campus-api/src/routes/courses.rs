//! # Courses API
//!
//! ## Endpoints
//!
//! - `POST /v1/courses` — create course (Staff)
//! - `GET /v1/courses` — paginated catalog listing
//! - `GET /v1/courses/:id` — get course
//! - `PUT /v1/courses/:id` — update course (Staff)
//! - `DELETE /v1/courses/:id` — delete course (Staff)

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::domain::CourseCode;
use campus_core::AppError;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::db;
use crate::db::courses::{CourseChanges, CourseRecord, NewCourse};
use crate::envelope::{ApiResponse, PageMeta, PageQuery, Paginated};
use crate::error::{on_unique_violation, ApiResult};
use crate::extractors::{extract_validated_json, FieldError, Validate};
use crate::state::AppState;

const MAX_CREDITS: i32 = 30;

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to create a course.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub course_code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub credits: i32,
}

impl Validate for CreateCourseRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(e) = CourseCode::new(self.course_code.as_str()) {
            errors.push(FieldError::new("course_code", e.to_string()));
        }
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title must not be empty"));
        }
        if !(1..=MAX_CREDITS).contains(&self.credits) {
            errors.push(FieldError::new(
                "credits",
                format!("credits must be between 1 and {MAX_CREDITS}"),
            ));
        }
        errors
    }
}

/// Request to update a course. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
}

impl Validate for UpdateCourseRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                errors.push(FieldError::new("title", "title must not be empty if provided"));
            }
        }
        if let Some(credits) = self.credits {
            if !(1..=MAX_CREDITS).contains(&credits) {
                errors.push(FieldError::new(
                    "credits",
                    format!("credits must be between 1 and {MAX_CREDITS}"),
                ));
            }
        }
        errors
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the courses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/courses", get(list_courses).post(create_course))
        .route(
            "/v1/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/courses — Create a course.
#[utoipa::path(
    post,
    path = "/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseRecord),
        (status = 400, description = "Validation error", body = crate::envelope::ErrorResponse),
        (status = 409, description = "Course code already in catalog", body = crate::envelope::ErrorResponse),
    ),
    tag = "courses"
)]
pub(crate) async fn create_course(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CourseRecord>>)> {
    require_role(&caller, Role::Staff)?;
    let req = extract_validated_json(body)?;

    // Validated above; normalizes to uppercase.
    let code = CourseCode::new(req.course_code.as_str()).map_err(AppError::from)?;

    let new = NewCourse {
        course_code: code.as_str().to_string(),
        title: req.title.trim().to_string(),
        description: req.description.map(|d| d.trim().to_string()),
        credits: req.credits,
    };

    let record = db::courses::insert(&state.db, &new)
        .await
        .map_err(|e| on_unique_violation(e, "course code already in catalog"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(record, "Course created")),
    ))
}

/// GET /v1/courses — Paginated catalog listing.
#[utoipa::path(
    get,
    path = "/v1/courses",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<i64>, Query, description = "Page size"),
    ),
    responses(
        (status = 200, description = "Paginated courses", body = Vec<CourseRecord>),
    ),
    tag = "courses"
)]
pub(crate) async fn list_courses(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<CourseRecord>>> {
    let Query(pq) = query.map_err(|e| AppError::validation(e.body_text()))?;

    let total = db::courses::count(&state.db).await?;
    let records = db::courses::list(&state.db, pq.limit(), pq.offset()).await?;

    Ok(Json(Paginated::new(
        records,
        PageMeta::compute(pq.page(), pq.limit(), total),
    )))
}

/// GET /v1/courses/:id — Get a single course.
#[utoipa::path(
    get,
    path = "/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = CourseRecord),
        (status = 404, description = "Course not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "courses"
)]
pub(crate) async fn get_course(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<CourseRecord>>> {
    let record = db::courses::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("course {id} not found")).with_status(404))?;

    Ok(Json(ApiResponse::ok(record)))
}

/// PUT /v1/courses/:id — Update a course.
#[utoipa::path(
    put,
    path = "/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseRecord),
        (status = 400, description = "Validation error", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "courses"
)]
pub(crate) async fn update_course(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<CourseRecord>>> {
    require_role(&caller, Role::Staff)?;
    let req = extract_validated_json(body)?;

    let changes = CourseChanges {
        title: req.title.map(|t| t.trim().to_string()),
        description: req.description.map(|d| d.trim().to_string()),
        credits: req.credits,
    };

    let record = db::courses::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::business(format!("course {id} not found")).with_status(404))?;

    Ok(Json(ApiResponse::with_message(record, "Course updated")))
}

/// DELETE /v1/courses/:id — Delete a course.
#[utoipa::path(
    delete,
    path = "/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 404, description = "Course not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "courses"
)]
pub(crate) async fn delete_course(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_role(&caller, Role::Staff)?;

    if !db::courses::delete(&state.db, id).await? {
        return Err(AppError::business(format!("course {id} not found"))
            .with_status(404)
            .into());
    }

    Ok(Json(ApiResponse::with_message((), "Course deleted")))
}
