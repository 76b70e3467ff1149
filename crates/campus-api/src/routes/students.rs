//! # Students API
//!
//! ## Endpoints
//!
//! - `POST /v1/students` — create student (Staff)
//! - `GET /v1/students` — paginated listing (Staff)
//! - `GET /v1/students/:id` — get student (owner or Staff)
//! - `PUT /v1/students/:id` — update student (Staff)
//! - `DELETE /v1/students/:id` — delete student (Staff)

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::domain::{Email, StudentNumber};
use campus_core::AppError;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::db;
use crate::db::students::{NewStudent, StudentChanges, StudentRecord};
use crate::envelope::{ApiResponse, PageMeta, PageQuery, Paginated};
use crate::error::{on_unique_violation, ApiResult};
use crate::extractors::{extract_validated_json, FieldError, Validate};
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to create a student record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Account to link the record to, if any.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl Validate for CreateStudentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(e) = StudentNumber::new(self.student_number.as_str()) {
            errors.push(FieldError::new("student_number", e.to_string()));
        }
        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "first_name must not be empty"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "last_name must not be empty"));
        }
        if let Err(e) = Email::new(self.email.as_str()) {
            errors.push(FieldError::new("email", e.to_string()));
        }
        errors
    }
}

/// Request to update a student record. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Validate for UpdateStudentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(ref name) = self.first_name {
            if name.trim().is_empty() {
                errors.push(FieldError::new(
                    "first_name",
                    "first_name must not be empty if provided",
                ));
            }
        }
        if let Some(ref name) = self.last_name {
            if name.trim().is_empty() {
                errors.push(FieldError::new(
                    "last_name",
                    "last_name must not be empty if provided",
                ));
            }
        }
        if let Some(ref email) = self.email {
            if let Err(e) = Email::new(email.as_str()) {
                errors.push(FieldError::new("email", e.to_string()));
            }
        }
        errors
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the students router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/students", get(list_students).post(create_student))
        .route(
            "/v1/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/students — Create a student record.
#[utoipa::path(
    post,
    path = "/v1/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentRecord),
        (status = 400, description = "Validation error", body = crate::envelope::ErrorResponse),
        (status = 409, description = "Student number already registered", body = crate::envelope::ErrorResponse),
    ),
    tag = "students"
)]
pub(crate) async fn create_student(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StudentRecord>>)> {
    require_role(&caller, Role::Staff)?;
    let req = extract_validated_json(body)?;

    let new = NewStudent {
        student_number: req.student_number.trim().to_string(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email: req.email.trim().to_string(),
        user_id: req.user_id,
    };

    let record = db::students::insert(&state.db, &new)
        .await
        .map_err(|e| on_unique_violation(e, "student number already registered"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(record, "Student created")),
    ))
}

/// GET /v1/students — Paginated student listing.
#[utoipa::path(
    get,
    path = "/v1/students",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<i64>, Query, description = "Page size"),
    ),
    responses(
        (status = 200, description = "Paginated students", body = Vec<StudentRecord>),
        (status = 403, description = "Staff role required", body = crate::envelope::ErrorResponse),
    ),
    tag = "students"
)]
pub(crate) async fn list_students(
    State(state): State<AppState>,
    caller: CallerIdentity,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<StudentRecord>>> {
    require_role(&caller, Role::Staff)?;
    let Query(pq) = query.map_err(|e| AppError::validation(e.body_text()))?;

    let total = db::students::count(&state.db).await?;
    let records = db::students::list(&state.db, pq.limit(), pq.offset()).await?;

    Ok(Json(Paginated::new(
        records,
        PageMeta::compute(pq.page(), pq.limit(), total),
    )))
}

/// GET /v1/students/:id — Get a single student record.
#[utoipa::path(
    get,
    path = "/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = StudentRecord),
        (status = 403, description = "Not the record owner", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "students"
)]
pub(crate) async fn get_student(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<StudentRecord>>> {
    let record = db::students::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::business(format!("student {id} not found")).with_status(404))?;

    if !caller.can_access_student(record.user_id) {
        return Err(AppError::security("cannot access another student's record").into());
    }

    Ok(Json(ApiResponse::ok(record)))
}

/// PUT /v1/students/:id — Update a student record.
#[utoipa::path(
    put,
    path = "/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentRecord),
        (status = 400, description = "Validation error", body = crate::envelope::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "students"
)]
pub(crate) async fn update_student(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<StudentRecord>>> {
    require_role(&caller, Role::Staff)?;
    let req = extract_validated_json(body)?;

    let changes = StudentChanges {
        first_name: req.first_name.map(|s| s.trim().to_string()),
        last_name: req.last_name.map(|s| s.trim().to_string()),
        email: req.email.map(|s| s.trim().to_string()),
    };

    let record = db::students::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::business(format!("student {id} not found")).with_status(404))?;

    Ok(Json(ApiResponse::with_message(record, "Student updated")))
}

/// DELETE /v1/students/:id — Delete a student record.
#[utoipa::path(
    delete,
    path = "/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found", body = crate::envelope::ErrorResponse),
    ),
    tag = "students"
)]
pub(crate) async fn delete_student(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_role(&caller, Role::Staff)?;

    if !db::students::delete(&state.db, id).await? {
        return Err(AppError::business(format!("student {id} not found"))
            .with_status(404)
            .into());
    }

    Ok(Json(ApiResponse::with_message((), "Student deleted")))
}
