//! Student API endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        attendance::{AttendanceRecord, AttendanceStanding, RecentRecordsQuery, StudentStats},
        student::Student,
    },
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct StudentListResponse {
    pub count: usize,
    pub students: Vec<Student>,
}

#[derive(Serialize, ToSchema)]
pub struct StudentStatsResponse {
    pub student: Student,
    pub stats: StudentStats,
    pub standing: AttendanceStanding,
    /// Length of the trailing window the stats cover
    pub window_days: u32,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceTodayResponse {
    pub student_id: String,
    pub date: NaiveDate,
    pub marked: bool,
}

/// List students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "Roster ordered by name", body = StudentListResponse)
    )
)]
pub async fn list_students(State(state): State<AppState>) -> Json<StudentListResponse> {
    let students = state.services.students.list();
    Json(StudentListResponse {
        count: students.len(),
        students,
    })
}

/// Get a student
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Unknown student", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Student>> {
    let student = state.services.students.get(&id)?;
    Ok(Json(student))
}

/// Attendance statistics over the trailing window
#[utoipa::path(
    get,
    path = "/students/{id}/stats",
    tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student statistics", body = StudentStatsResponse),
        (status = 404, description = "Unknown student", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_student_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StudentStatsResponse>> {
    let student = state.services.students.get(&id)?;
    let stats = state.services.attendance.student_stats(&student.id)?;

    Ok(Json(StudentStatsResponse {
        student,
        standing: stats.standing(),
        stats,
        window_days: state.config.attendance.stats_window_days,
    }))
}

/// Most recent records of a student
#[utoipa::path(
    get,
    path = "/students/{id}/records",
    tag = "students",
    params(
        ("id" = String, Path, description = "Student ID"),
        RecentRecordsQuery
    ),
    responses(
        (status = 200, description = "Records, newest first", body = Vec<AttendanceRecord>),
        (status = 404, description = "Unknown student", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_student_records(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RecentRecordsQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let limit = query
        .limit
        .unwrap_or(state.config.attendance.recent_records_limit);
    let records = state.services.attendance.recent_records(&id, limit)?;
    Ok(Json(records))
}

/// Whether the student has checked in today
#[utoipa::path(
    get,
    path = "/students/{id}/attendance-today",
    tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Check-in state for today", body = AttendanceTodayResponse),
        (status = 404, description = "Unknown student", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_attendance_today(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AttendanceTodayResponse>> {
    let student = state.services.students.get(&id)?;
    let attendance = &state.services.attendance;

    Ok(Json(AttendanceTodayResponse {
        marked: attendance.has_marked_attendance_today(&student.id)?,
        date: attendance.now().date(),
        student_id: student.id,
    }))
}
