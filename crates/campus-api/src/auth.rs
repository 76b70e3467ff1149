//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with role-based access control.
//!
//! ## Token Format
//!
//! Bearer tokens encode role and account identity:
//!
//! ```text
//! Bearer {role}:{user_id}:{secret}   — issued by POST /v1/auth/login
//! Bearer {secret}                    — legacy format (treated as Admin)
//! ```
//!
//! The secret is compared in constant time. When no secret is configured,
//! authentication is disabled and every request runs as `Admin`
//! (development mode).
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.
//! The auth middleware also copies the identity into the response
//! extensions so the error-log middleware can attribute failures to the
//! authenticated account.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use campus_core::AppError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles in the Campus Stack, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `Student < Staff < Admin`. This enables `>=` comparison for role-based
/// access checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can read own student record and enrollments.
    Student,
    /// Can manage students, courses, and enrollments.
    Staff,
    /// Full access, including account registration and error-log queries.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role in the system.
    pub role: Role,
    /// The caller's account ID. `None` for legacy admin tokens and for
    /// development mode with authentication disabled.
    pub user_id: Option<Uuid>,
}

impl CallerIdentity {
    /// Check if the caller has at least the given minimum role.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }

    /// Check if the caller can access the student record owned by
    /// `owner_user_id`.
    ///
    /// - `Admin` and `Staff` can access any record.
    /// - `Student` can only access records linked to their own account.
    pub fn can_access_student(&self, owner_user_id: Option<Uuid>) -> bool {
        match self.role {
            Role::Admin | Role::Staff => true,
            Role::Student => match (self.user_id, owner_user_id) {
                (Some(caller), Some(owner)) => caller == owner,
                // No account binding or unlinked record = denied.
                _ => false,
            },
        }
    }
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Rejects with 401 if no identity is present (middleware didn't run).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| {
                AppError::security("no caller identity in request context")
                    .with_status(401)
                    .into()
            })
    }
}

/// Check that the caller has at least the required role.
/// Returns a 403 security error if the caller's role is insufficient.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::security(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the secret to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation & Issuance ─────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, a dummy comparison keeps timing constant regardless
/// of the length mismatch.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token in format `{role}:{user_id}:{secret}` or `{secret}`
/// (legacy, treated as Admin).
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.len() {
        // Legacy format: just the secret.
        1 => {
            if constant_time_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::Admin,
                    user_id: None,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        // Issued format: role:user_id:secret (user_id may be empty).
        3 => {
            let role_str = parts[0];
            let user_str = parts[1];
            let secret = parts[2];

            if !constant_time_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }

            let role: Role = role_str.parse()?;

            let user_id = if user_str.is_empty() {
                None
            } else {
                Some(
                    user_str
                        .parse::<Uuid>()
                        .map_err(|e| format!("invalid user_id: {e}"))?,
                )
            };

            Ok(CallerIdentity { role, user_id })
        }
        _ => Err("invalid token format — expected {role}:{user_id}:{secret} or {secret}".into()),
    }
}

/// Compose a bearer token for an authenticated account.
pub fn issue_token(role: Role, user_id: Uuid, secret: &str) -> String {
    format!("{}:{}:{}", role.as_str(), user_id, secret)
}

// ── Password Digests ────────────────────────────────────────────────────────
//
// Passwords are stored as hex(SHA-256(salt || password)) with a per-user
// random salt, and verified in constant time.

/// Generate a fresh random salt, hex-encoded.
pub fn generate_salt() -> String {
    use rand_core::RngCore;
    let mut bytes = [0u8; 16];
    rand_core::OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

/// Compute the hex-encoded password digest for storage.
pub fn password_digest(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex_encode(&hasher.finalize())
}

/// Verify a password against a stored salt and digest in constant time.
pub fn verify_password(salt_hex: &str, stored_digest: &str, password: &str) -> bool {
    constant_time_eq(&password_digest(salt_hex, password), stored_digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token to extract [`CallerIdentity`] (role + account binding)
/// and injects it into request extensions for downstream handlers. Rejection
/// responses are built through [`ApiError`] so they carry the uniform error
/// envelope and flow through the error-log middleware.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_config = request.extensions().get::<AuthConfig>().cloned();

    let identity = match auth_config {
        Some(AuthConfig {
            secret: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(value) if value.starts_with("Bearer ") => {
                    match parse_bearer_token(&value[7..], expected) {
                        Ok(identity) => identity,
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            return unauthorized_response(&msg);
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    return unauthorized_response("authorization header must use Bearer scheme");
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    return unauthorized_response("missing authorization header");
                }
            }
        }
        // Auth disabled — run as Admin (development mode).
        _ => CallerIdentity {
            role: Role::Admin,
            user_id: None,
        },
    };

    request.extensions_mut().insert(identity.clone());
    let mut response = next.run(request).await;
    // Make the identity available to the error-log middleware.
    response.extensions_mut().insert(identity);
    response
}

fn unauthorized_response(message: &str) -> Response {
    ApiError::from(AppError::security(message).with_status(401)).into_response()
}
