//! API handlers for the attendance REST endpoints

pub mod attendance;
pub mod face_capture;
pub mod health;
pub mod openapi;
pub mod students;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let capture_body_limit = capture_body_limit(state.config.face_capture.max_image_bytes);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Attendance
        .route("/attendance/token", get(attendance::get_token))
        .route("/attendance/mark", post(attendance::mark_attendance))
        .route("/attendance/today-stats", get(attendance::get_today_stats))
        .route("/attendance/today-list", get(attendance::get_today_list))
        .route("/attendance/report", get(attendance::get_report))
        // Students
        .route("/students", get(students::list_students))
        .route("/students/:id", get(students::get_student))
        .route("/students/:id/stats", get(students::get_student_stats))
        .route("/students/:id/records", get(students::get_student_records))
        .route("/students/:id/attendance-today", get(students::get_attendance_today))
        // Face capture
        .route(
            "/students/:id/face-capture",
            get(face_capture::get_face_capture)
                .post(face_capture::save_face_capture)
                .layer(DefaultBodyLimit::max(capture_body_limit)),
        )
        .route(
            "/students/:id/face-capture/eligibility",
            get(face_capture::get_eligibility),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Request body limit for face capture uploads: the base64 expansion of the
/// largest accepted image plus room for a data URL header and the JSON wrapper
fn capture_body_limit(max_image_bytes: usize) -> usize {
    max_image_bytes.div_ceil(3) * 4 + 64 * 1024
}
