//! # Authentication API
//!
//! ## Endpoints
//!
//! - `POST /v1/auth/login` — exchange credentials for a bearer token (public)
//! - `GET /v1/auth/me` — echo the authenticated identity
//! - `POST /v1/auth/register` — create an account (Admin)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use campus_core::domain::Email;
use campus_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{self, require_role, CallerIdentity, Role};
use crate::db;
use crate::envelope::ApiResponse;
use crate::error::{on_unique_violation, ApiResult};
use crate::extractors::{extract_validated_json, FieldError, Validate};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Credentials for login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(e) = Email::new(self.email.as_str()) {
            errors.push(FieldError::new("email", e.to_string()));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "password must not be empty"));
        }
        errors
    }
}

/// Issued token and account identity.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user_id: Uuid,
}

/// The authenticated caller's identity.
#[derive(Debug, Serialize, ToSchema)]
pub struct IdentityResponse {
    pub role: Role,
    pub user_id: Option<Uuid>,
}

/// Request to create an account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: Role,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(e) = Email::new(self.email.as_str()) {
            errors.push(FieldError::new("email", e.to_string()));
        }
        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("full_name", "full_name must not be empty"));
        }
        if self.password.len() < 8 {
            errors.push(FieldError::new(
                "password",
                "password must be at least 8 characters",
            ));
        }
        errors
    }
}

/// Created account (credentials omitted).
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

// ── Routers ─────────────────────────────────────────────────────────

/// Routes reachable without credentials.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/v1/auth/login", post(login))
}

/// Routes behind the auth middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/me", get(me))
        .route("/v1/auth/register", post(register))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/auth/login — Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::envelope::ErrorResponse),
        (status = 503, description = "Authentication not configured", body = crate::envelope::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let req = extract_validated_json(body)?;

    let secret = state.config.auth_secret.clone().ok_or_else(|| {
        AppError::technical("authentication is not configured").with_status(503)
    })?;

    // Same rejection for unknown account and wrong password.
    let user = db::users::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| AppError::security("invalid credentials").with_status(401))?;

    if !auth::verify_password(&user.password_salt, &user.password_hash, &req.password) {
        return Err(AppError::security("invalid credentials")
            .with_status(401)
            .into());
    }

    let token = auth::issue_token(user.role, user.id, &secret);
    Ok(Json(ApiResponse::with_message(
        LoginResponse {
            token,
            role: user.role,
            user_id: user.id,
        },
        "Login successful",
    )))
}

/// GET /v1/auth/me — Echo the authenticated identity.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Caller identity", body = IdentityResponse),
        (status = 401, description = "Not authenticated", body = crate::envelope::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn me(caller: CallerIdentity) -> Json<ApiResponse<IdentityResponse>> {
    Json(ApiResponse::ok(IdentityResponse {
        role: caller.role,
        user_id: caller.user_id,
    }))
}

/// POST /v1/auth/register — Create an account.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredUser),
        (status = 400, description = "Validation error", body = crate::envelope::ErrorResponse),
        (status = 403, description = "Admin role required", body = crate::envelope::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::envelope::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RegisteredUser>>)> {
    require_role(&caller, Role::Admin)?;
    let req = extract_validated_json(body)?;

    let salt = auth::generate_salt();
    let new = db::users::NewUser {
        email: req.email.trim().to_string(),
        full_name: req.full_name.trim().to_string(),
        role: req.role,
        password_hash: auth::password_digest(&salt, &req.password),
        password_salt: salt,
    };

    let user = db::users::insert(&state.db, &new)
        .await
        .map_err(|e| on_unique_violation(e, "email already registered"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            RegisteredUser {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
                role: user.role,
            },
            "Account created",
        )),
    ))
}
