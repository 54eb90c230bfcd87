//! Mark attendance flow: input -> result -> input

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AttendanceError},
    models::attendance::{AttendanceRecord, AttendanceStatus},
};

use super::TransitionError;

/// How the result screen presents an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    /// Soft notice, e.g. attendance was already recorded
    Notice,
    Error,
}

/// Message plus success flag shown after a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MarkOutcome {
    pub success: bool,
    pub kind: OutcomeKind,
    pub message: String,
    pub status: Option<AttendanceStatus>,
}

impl MarkOutcome {
    pub fn recorded(record: &AttendanceRecord) -> Self {
        let message = match record.status {
            AttendanceStatus::LatePresent => format!(
                "Attendance recorded for {} at {}, marked late.",
                record.student_name,
                record.time.format("%H:%M")
            ),
            _ => format!(
                "Attendance recorded for {} at {}.",
                record.student_name,
                record.time.format("%H:%M")
            ),
        };
        Self {
            success: true,
            kind: OutcomeKind::Success,
            message,
            status: Some(record.status),
        }
    }

    pub fn rejected(error: &AttendanceError) -> Self {
        let (kind, message) = match error {
            AttendanceError::AlreadyRecorded { student_id, .. } => (
                OutcomeKind::Notice,
                format!("Attendance has already been recorded today for {}.", student_id),
            ),
            AttendanceError::UnknownStudent(id) => (
                OutcomeKind::Error,
                format!("Student ID {} was not found. Please check and try again.", id),
            ),
            AttendanceError::InvalidToken => (
                OutcomeKind::Error,
                "Invalid attendance token. Please use today's token.".to_string(),
            ),
        };
        Self {
            success: false,
            kind,
            message,
            status: None,
        }
    }

    /// Outcome for any service result; non-attendance failures are generic errors
    pub fn from_result(result: &Result<AttendanceRecord, AppError>) -> Self {
        match result {
            Ok(record) => Self::recorded(record),
            Err(AppError::Attendance(e)) => Self::rejected(e),
            Err(_) => Self {
                success: false,
                kind: OutcomeKind::Error,
                message: "Attendance could not be recorded. Please try again.".to_string(),
                status: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkStep {
    Input,
    Result(MarkOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkEvent {
    Submitted(MarkOutcome),
    Reset,
}

impl MarkStep {
    pub fn name(&self) -> &'static str {
        match self {
            MarkStep::Input => "input",
            MarkStep::Result(_) => "result",
        }
    }

    pub fn transition(self, event: MarkEvent) -> Result<MarkStep, TransitionError> {
        match (self, event) {
            (MarkStep::Input, MarkEvent::Submitted(outcome)) => Ok(MarkStep::Result(outcome)),
            (MarkStep::Result(_), MarkEvent::Reset) => Ok(MarkStep::Input),
            (step, event) => Err(TransitionError {
                step: step.name(),
                event: event.name(),
            }),
        }
    }
}

impl MarkEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MarkEvent::Submitted(_) => "submitted",
            MarkEvent::Reset => "reset",
        }
    }
}
