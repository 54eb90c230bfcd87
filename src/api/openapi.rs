//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendance, face_capture, health, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = "Daily token check-in and attendance statistics"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Attendance
        attendance::get_token,
        attendance::mark_attendance,
        attendance::get_today_stats,
        attendance::get_today_list,
        attendance::get_report,
        // Students
        students::list_students,
        students::get_student,
        students::get_student_stats,
        students::get_student_records,
        students::get_attendance_today,
        // Face capture
        face_capture::get_eligibility,
        face_capture::get_face_capture,
        face_capture::save_face_capture,
    ),
    components(
        schemas(
            // Attendance
            attendance::TokenResponse,
            attendance::MarkAttendanceResponse,
            attendance::TodayListResponse,
            attendance::ReportResponse,
            crate::models::attendance::AttendanceRecord,
            crate::models::attendance::AttendanceStatus,
            crate::models::attendance::AttendanceStanding,
            crate::models::attendance::StudentStats,
            crate::models::attendance::DashboardStats,
            crate::models::attendance::MarkAttendanceRequest,
            crate::models::attendance::RecordQuery,
            crate::models::attendance::RecentRecordsQuery,
            crate::workflow::OutcomeKind,
            // Students
            students::StudentListResponse,
            students::StudentStatsResponse,
            students::AttendanceTodayResponse,
            crate::models::student::Student,
            // Face capture
            crate::models::face_capture::FaceCapture,
            crate::models::face_capture::SaveFaceCapture,
            crate::models::face_capture::FaceCaptureEligibility,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "attendance", description = "Check-in and attendance listings"),
        (name = "students", description = "Roster and per-student statistics"),
        (name = "face_capture", description = "Photo capture after check-in")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
