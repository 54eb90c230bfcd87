//! Attendance API endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::attendance::{
        AttendanceRecord, AttendanceStatus, DashboardStats, MarkAttendanceRequest, RecordQuery,
    },
    workflow::{MarkOutcome, OutcomeKind},
    AppState,
};

/// Today's token
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub date: NaiveDate,
    #[schema(example = "ATT-3FA91C")]
    pub token: String,
    /// Check-ins after this time (HH:MM) are marked late
    pub cutoff_time: String,
}

/// Outcome of a check-in, for both accepted and rejected submissions
#[derive(Serialize, ToSchema)]
pub struct MarkAttendanceResponse {
    pub success: bool,
    /// `notice` for an already recorded check-in, `error` for other rejections
    pub kind: OutcomeKind,
    pub message: String,
    pub status: Option<AttendanceStatus>,
    pub record: Option<AttendanceRecord>,
    /// Error name when rejected (e.g. `AlreadyRecorded`)
    pub error: Option<String>,
}

/// Record listing for a single day
#[derive(Serialize, ToSchema)]
pub struct TodayListResponse {
    pub date: NaiveDate,
    pub count: usize,
    pub records: Vec<AttendanceRecord>,
}

/// Record listing for a report query
#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub count: usize,
    pub records: Vec<AttendanceRecord>,
}

/// Get today's attendance token
#[utoipa::path(
    get,
    path = "/attendance/token",
    tag = "attendance",
    responses(
        (status = 200, description = "Token valid for the current day", body = TokenResponse)
    )
)]
pub async fn get_token(State(state): State<AppState>) -> Json<TokenResponse> {
    let attendance = &state.services.attendance;
    Json(TokenResponse {
        date: attendance.now().date(),
        token: attendance.todays_token(),
        cutoff_time: attendance.cutoff().format("%H:%M").to_string(),
    })
}

/// Mark attendance with a student ID and today's token
#[utoipa::path(
    post,
    path = "/attendance/mark",
    tag = "attendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Invalid token", body = MarkAttendanceResponse),
        (status = 404, description = "Unknown student", body = MarkAttendanceResponse),
        (status = 409, description = "Attendance already recorded today", body = MarkAttendanceResponse)
    )
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(request): Json<MarkAttendanceRequest>,
) -> AppResult<(StatusCode, Json<MarkAttendanceResponse>)> {
    let result = state
        .services
        .attendance
        .mark_attendance(&request.student_id, &request.token);
    let outcome = MarkOutcome::from_result(&result);

    let (status, record, error) = match result {
        Ok(record) => (StatusCode::CREATED, Some(record), None),
        Err(error @ AppError::Attendance(_)) => {
            let (status, code) = error.classify();
            (status, None, Some(format!("{:?}", code)))
        }
        Err(other) => return Err(other),
    };

    Ok((
        status,
        Json(MarkAttendanceResponse {
            success: outcome.success,
            kind: outcome.kind,
            message: outcome.message,
            status: outcome.status,
            record,
            error,
        }),
    ))
}

/// Dashboard counts for today
#[utoipa::path(
    get,
    path = "/attendance/today-stats",
    tag = "attendance",
    responses(
        (status = 200, description = "Today's attendance counts", body = DashboardStats)
    )
)]
pub async fn get_today_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let stats = state.services.attendance.today_stats()?;
    Ok(Json(stats))
}

/// Today's check-ins, newest first
#[utoipa::path(
    get,
    path = "/attendance/today-list",
    tag = "attendance",
    responses(
        (status = 200, description = "Today's records", body = TodayListResponse)
    )
)]
pub async fn get_today_list(State(state): State<AppState>) -> AppResult<Json<TodayListResponse>> {
    let attendance = &state.services.attendance;
    let records = attendance.today_records()?;
    Ok(Json(TodayListResponse {
        date: attendance.now().date(),
        count: records.len(),
        records,
    }))
}

/// Attendance report filtered by date range and student
#[utoipa::path(
    get,
    path = "/attendance/report",
    tag = "attendance",
    params(RecordQuery),
    responses(
        (status = 200, description = "Matching records, newest first", body = ReportResponse)
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<ReportResponse>> {
    let records = state.services.attendance.report(&query)?;
    Ok(Json(ReportResponse {
        count: records.len(),
        records,
    }))
}
