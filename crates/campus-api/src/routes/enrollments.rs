//! # Enrollments API
//!
//! ## Endpoints
//!
//! - `POST /v1/enrollments` — enroll a student in a course (Staff)
//! - `GET /v1/students/:id/enrollments` — a student's enrollments (owner or Staff)
//! - `GET /v1/courses/:id/enrollments` — a course's roster (Staff)
//! - `PUT /v1/enrollments/:id/grade` — record a grade (Staff)
//! - `DELETE /v1/enrollments/:id` — drop an enrollment (Staff)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use campus_core::AppError;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::db;
use crate::db::enrollments::{EnrollmentRecord, EnrollmentStatus};
use crate::envelope::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{extract_validated_json, FieldError, Validate};
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to enroll a student in a course.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollRequest {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

/// Request to record a grade.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GradeRequest {
    /// Letter grade, e.g. `A`, `B+`, `F`, `W`, `I`.
    pub grade: String,
}

impl Validate for GradeRequest {
    fn validate(&self) -> Vec<FieldError> {
        let trimmed = self.grade.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= 3
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-');
        if valid {
            Vec::new()
        } else {
            vec![FieldError::new(
                "grade",
                "grade must be 1-3 characters (letters, digits, '+' or '-')",
            )]
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the enrollments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/enrollments", post(create_enrollment))
        .route("/v1/enrollments/:id/grade", put(record_grade))
        .route("/v1/enrollments/:id", delete(drop_enrollment))
        .route(
            "/v1/students/:id/enrollments",
            get(list_student_enrollments),
        )
        .route("/v1/courses/:id/enrollments", get(list_course_enrollments))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/enrollments — Enroll a student in a course.
#[utoipa::path(
    post,
    path = "/v1/enrollments",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentRecord),
        (status = 400, description = "Already enrolled", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Student or course not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "enrollments"
)]
pub(crate) async fn create_enrollment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<EnrollRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EnrollmentRecord>>)> {
    require_role(&caller, Role::Staff)?;
    let req = crate::extractors::extract_json(body)?;

    // FK existence checks live here, not in SQL.
    db::students::get_by_id(&state.db, req.student_id)
        .await?
        .ok_or_else(|| {
            AppError::business(format!("student {} not found", req.student_id)).with_status(404)
        })?;
    db::courses::get_by_id(&state.db, req.course_id)
        .await?
        .ok_or_else(|| {
            AppError::business(format!("course {} not found", req.course_id)).with_status(404)
        })?;

    if db::enrollments::active_exists(&state.db, req.student_id, req.course_id).await? {
        return Err(
            AppError::business("student is already enrolled in this course").into(),
        );
    }

    let record = db::enrollments::insert(&state.db, req.student_id, req.course_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(record, "Enrollment created")),
    ))
}

/// GET /v1/students/:id/enrollments — A student's enrollments.
#[utoipa::path(
    get,
    path = "/v1/students/{id}/enrollments",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrollments", body = Vec<EnrollmentRecord>),
        (status = 403, description = "Not the record owner", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "enrollments"
)]
pub(crate) async fn list_student_enrollments(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<EnrollmentRecord>>>> {
    let student = db::students::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("student {id} not found")).with_status(404))?;

    if !caller.can_access_student(student.user_id) {
        return Err(AppError::security("cannot access another student's enrollments").into());
    }

    let records = db::enrollments::list_for_student(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// GET /v1/courses/:id/enrollments — A course's roster.
#[utoipa::path(
    get,
    path = "/v1/courses/{id}/enrollments",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrollments", body = Vec<EnrollmentRecord>),
        (status = 404, description = "Course not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "enrollments"
)]
pub(crate) async fn list_course_enrollments(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<EnrollmentRecord>>>> {
    require_role(&caller, Role::Staff)?;

    db::courses::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("course {id} not found")).with_status(404))?;

    let records = db::enrollments::list_for_course(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// PUT /v1/enrollments/:id/grade — Record a grade.
#[utoipa::path(
    put,
    path = "/v1/enrollments/{id}/grade",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = GradeRequest,
    responses(
        (status = 200, description = "Grade recorded", body = EnrollmentRecord),
        (status = 400, description = "Validation error or dropped enrollment", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Enrollment not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "enrollments"
)]
pub(crate) async fn record_grade(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<GradeRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<EnrollmentRecord>>> {
    require_role(&caller, Role::Staff)?;
    let req = extract_validated_json(body)?;

    let existing = db::enrollments::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("enrollment {id} not found")).with_status(404))?;

    if existing.status == EnrollmentStatus::Dropped {
        return Err(AppError::business("cannot grade a dropped enrollment").into());
    }

    let grade = req.grade.trim().to_ascii_uppercase();
    let record = db::enrollments::record_grade(&state.db, id, &grade)
        .await?
        .ok_or_else(|| AppError::business(format!("enrollment {id} not found")).with_status(404))?;

    Ok(Json(ApiResponse::with_message(record, "Grade recorded")))
}

/// DELETE /v1/enrollments/:id — Drop an enrollment.
///
/// The row is kept with status `DROPPED` for the transcript.
#[utoipa::path(
    delete,
    path = "/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment dropped", body = EnrollmentRecord),
        (status = 400, description = "Already dropped", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Enrollment not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "enrollments"
)]
pub(crate) async fn drop_enrollment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<EnrollmentRecord>>> {
    require_role(&caller, Role::Staff)?;

    let existing = db::enrollments::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("enrollment {id} not found")).with_status(404))?;

    if existing.status == EnrollmentStatus::Dropped {
        return Err(AppError::business("enrollment is already dropped").into());
    }

    let record = db::enrollments::drop_enrollment(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("enrollment {id} not found")).with_status(404))?;

    Ok(Json(ApiResponse::with_message(record, "Enrollment dropped")))
}
