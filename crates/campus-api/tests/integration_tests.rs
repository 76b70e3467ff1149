//! # Integration Tests for campus-api
//!
//! Drives the assembled router: health probes, authentication middleware,
//! role enforcement, validation failures, the uniform error envelope,
//! correlation-id propagation, and the database-outage error path.
//!
//! The pool is built lazily against an unreachable address, so every test
//! runs without a live Postgres: handlers that touch the database exercise
//! the technical-error path, and everything upstream of the database
//! (validation, auth, envelopes) behaves exactly as in production.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use campus_api::state::{AppConfig, AppState};

/// Nothing listens on port 1; connection attempts fail immediately.
const DEAD_DATABASE_URL: &str = "postgres://127.0.0.1:1/campus_test";

/// Helper: build the test app with auth disabled.
fn test_app() -> axum::Router {
    let config = AppConfig {
        port: 8080,
        database_url: DEAD_DATABASE_URL.to_string(),
        auth_secret: None,
    };
    campus_api::app(AppState::new(config).unwrap())
}

/// Helper: build the test app with auth enabled.
fn test_app_with_auth(secret: &str) -> axum::Router {
    let config = AppConfig {
        port: 8080,
        database_url: DEAD_DATABASE_URL.to_string(),
        auth_secret: Some(secret.to_string()),
    };
    campus_api::app(AppState::new(config).unwrap())
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn liveness_probe_is_public() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn readiness_probe_is_public() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn missing_token_gets_security_envelope() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/students")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "SECURITY_ERROR");
    assert!(body["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn invalid_token_rejected() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/students")
                .header("Authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_echoes_identity_with_auth_disabled() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Success");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn me_echoes_identity_from_token() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/auth/me")
                .header(
                    "Authorization",
                    "Bearer student:550e8400-e29b-41d4-a716-446655440000:secret",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "student");
    assert_eq!(
        body["data"]["user_id"],
        "550e8400-e29b-41d4-a716-446655440000"
    );
}

// -- Role Enforcement ---------------------------------------------------------

#[tokio::test]
async fn student_cannot_list_students() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/students")
                .header(
                    "Authorization",
                    "Bearer student:550e8400-e29b-41d4-a716-446655440000:secret",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "SECURITY_ERROR");
    assert!(body["message"].as_str().unwrap().contains("staff"));
}

#[tokio::test]
async fn staff_cannot_read_error_logs() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/admin/error-logs")
                .header("Authorization", "Bearer staff::secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// -- Validation ---------------------------------------------------------------

#[tokio::test]
async fn invalid_student_body_gets_field_details() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/students")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "student_number": "",
                        "first_name": "  ",
                        "last_name": "Khan",
                        "email": "not-an-email"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    // Validation rejects before any database access.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "request validation failed");
    let details = body["details"].as_object().unwrap();
    assert!(details.contains_key("student_number"));
    assert!(details.contains_key("first_name"));
    assert!(details.contains_key("email"));
    assert!(!details.contains_key("last_name"));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/courses")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn garbage_page_param_is_a_validation_error() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/students?page=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// -- Database Outage ----------------------------------------------------------
//
// The pool points at a dead address: every query fails. The client must
// still receive the uniform technical-error envelope, and the (also
// failing) error-log write must not affect the response.

#[tokio::test]
async fn database_outage_yields_technical_envelope() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/students")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "TECHNICAL_ERROR");
    assert_eq!(body["message"], "database operation failed");
    // Raw driver details never reach the client.
    assert!(!body.to_string().contains("127.0.0.1"));
}

#[tokio::test]
async fn login_with_dead_database_yields_technical_envelope() {
    let app = test_app_with_auth("secret");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"email": "a@b.edu", "password": "pw"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "TECHNICAL_ERROR");
}

#[tokio::test]
async fn login_without_configured_secret_is_unavailable() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"email": "a@b.edu", "password": "pw"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "TECHNICAL_ERROR");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("not configured"));
}

// -- Correlation ID -----------------------------------------------------------

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/students")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "abc-123"
    );
}

#[tokio::test]
async fn generated_request_ids_are_unique() {
    let first = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let second = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let id_a = first.headers().get("x-request-id").unwrap().to_str().unwrap();
    let id_b = second
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap();
    assert_ne!(id_a, id_b);
    assert!(uuid::Uuid::parse_str(id_a).is_ok());
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn openapi_spec_is_served() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["openapi"].as_str().is_some());
    assert!(body["paths"]["/v1/students"].is_object());
}
