//! # Admin API
//!
//! Operator read-back of the persisted error log.
//!
//! ## Endpoints
//!
//! - `GET /v1/admin/error-logs` — most recent error records (Admin)

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use campus_core::AppError;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::db;
use crate::db::error_logs::ErrorLogRecord;
use crate::envelope::{ApiResponse, PageQuery};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/admin/error-logs", get(list_error_logs))
}

/// GET /v1/admin/error-logs — Most recent error records.
#[utoipa::path(
    get,
    path = "/v1/admin/error-logs",
    params(("limit" = Option<i64>, Query, description = "Maximum number of records")),
    responses(
        (status = 200, description = "Recent error records", body = Vec<ErrorLogRecord>),
        (status = 403, description = "Admin role required", body = crate::envelope::ErrorResponse),
    ),
    tag = "admin"
)]
pub(crate) async fn list_error_logs(
    State(state): State<AppState>,
    caller: CallerIdentity,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<ErrorLogRecord>>>> {
    require_role(&caller, Role::Admin)?;
    let Query(pq) = query.map_err(|e| AppError::validation(e.body_text()))?;

    let limit = pq.limit.unwrap_or(DEFAULT_LIMIT);
    let records = db::error_logs::recent(&state.db, limit).await?;
    Ok(Json(ApiResponse::ok(records)))
}
