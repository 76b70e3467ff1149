//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus API",
        version = "0.3.1",
        description = "REST API for the Campus Stack: authentication, student records, course catalog, enrollments, and the error-log console.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Auth
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::register,
        // Students
        crate::routes::students::create_student,
        crate::routes::students::list_students,
        crate::routes::students::get_student,
        crate::routes::students::update_student,
        crate::routes::students::delete_student,
        // Courses
        crate::routes::courses::create_course,
        crate::routes::courses::list_courses,
        crate::routes::courses::get_course,
        crate::routes::courses::update_course,
        crate::routes::courses::delete_course,
        // Enrollments
        crate::routes::enrollments::create_enrollment,
        crate::routes::enrollments::list_student_enrollments,
        crate::routes::enrollments::list_course_enrollments,
        crate::routes::enrollments::record_grade,
        crate::routes::enrollments::drop_enrollment,
        // Admin
        crate::routes::admin::list_error_logs,
    ),
    components(schemas(
        // Envelope
        crate::envelope::ErrorResponse,
        crate::envelope::PageMeta,
        // Records
        crate::db::students::StudentRecord,
        crate::db::courses::CourseRecord,
        crate::db::enrollments::EnrollmentRecord,
        crate::db::enrollments::EnrollmentStatus,
        crate::db::error_logs::ErrorLogRecord,
        // Auth
        crate::auth::Role,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::LoginResponse,
        crate::routes::auth::IdentityResponse,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::RegisteredUser,
        // Student DTOs
        crate::routes::students::CreateStudentRequest,
        crate::routes::students::UpdateStudentRequest,
        // Course DTOs
        crate::routes::courses::CreateCourseRequest,
        crate::routes::courses::UpdateCourseRequest,
        // Enrollment DTOs
        crate::routes::enrollments::EnrollRequest,
        crate::routes::enrollments::GradeRequest,
    )),
    tags(
        (name = "auth", description = "Authentication & account management"),
        (name = "students", description = "Student records"),
        (name = "courses", description = "Course catalog"),
        (name = "enrollments", description = "Enrollment lifecycle"),
        (name = "admin", description = "Operator console"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builds_and_lists_paths() {
        let spec = ApiDoc::openapi();
        let rendered = serde_json::to_value(&spec).unwrap();
        let paths = rendered["paths"].as_object().unwrap();
        assert!(paths.contains_key("/v1/auth/login"));
        assert!(paths.contains_key("/v1/students"));
        assert!(paths.contains_key("/v1/students/{id}"));
        assert!(paths.contains_key("/v1/enrollments"));
        assert!(paths.contains_key("/v1/admin/error-logs"));
    }
}
