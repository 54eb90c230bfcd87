//! Face capture API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::face_capture::{FaceCapture, FaceCaptureEligibility, SaveFaceCapture},
    AppState,
};

/// Which step the capture screen should open in
#[utoipa::path(
    get,
    path = "/students/{id}/face-capture/eligibility",
    tag = "face_capture",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Eligibility state", body = FaceCaptureEligibility)
    )
)]
pub async fn get_eligibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FaceCaptureEligibility>> {
    let eligibility = state.services.face_capture.eligibility(&id)?;
    Ok(Json(eligibility))
}

/// Get today's face capture
#[utoipa::path(
    get,
    path = "/students/{id}/face-capture",
    tag = "face_capture",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Today's capture", body = FaceCapture),
        (status = 404, description = "No capture today or unknown student", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_face_capture(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FaceCapture>> {
    state
        .services
        .face_capture
        .today(&id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No face capture today for {}", id.trim())))
}

/// Save today's face capture (once per day, after check-in)
#[utoipa::path(
    post,
    path = "/students/{id}/face-capture",
    tag = "face_capture",
    params(("id" = String, Path, description = "Student ID")),
    request_body = SaveFaceCapture,
    responses(
        (status = 201, description = "Capture stored", body = FaceCapture),
        (status = 400, description = "Invalid image", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown student", body = crate::error::ErrorResponse),
        (status = 409, description = "Already captured today", body = crate::error::ErrorResponse),
        (status = 422, description = "Attendance not marked today", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_face_capture(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<SaveFaceCapture>,
) -> AppResult<(StatusCode, Json<FaceCapture>)> {
    data.validate()?;

    let capture = state.services.face_capture.save(&id, &data.image)?;
    Ok((StatusCode::CREATED, Json(capture)))
}
