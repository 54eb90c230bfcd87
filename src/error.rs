//! Error types for the attendance server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NoSuchStudent = 2,
    InvalidToken = 3,
    AlreadyRecorded = 4,
    BadValue = 5,
    Duplicate = 6,
    NoSuchData = 7,
    NotEligible = 8,
}

/// Check-in failures. All of them are user-correctable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("Student {0} was not found")]
    UnknownStudent(String),

    #[error("Invalid attendance token for today")]
    InvalidToken,

    #[error("Attendance already recorded for {student_id} on {date}")]
    AlreadyRecorded { student_id: String, date: NaiveDate },
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Attendance(#[from] AttendanceError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    pub(crate) fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Attendance(AttendanceError::UnknownStudent(_)) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchStudent)
            }
            AppError::Attendance(AttendanceError::InvalidToken) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidToken)
            }
            AppError::Attendance(AttendanceError::AlreadyRecorded { .. }) => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyRecorded)
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::BusinessRule(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::NotEligible)
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let message = match &self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Attendance(e) => e.to_string(),
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BusinessRule(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
