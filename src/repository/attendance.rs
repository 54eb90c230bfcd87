//! Append-only attendance log

use std::collections::HashSet;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult, AttendanceError},
    models::attendance::AttendanceRecord,
};

/// Selection applied to record listings
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub student_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl RecordFilter {
    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Default::default()
        }
    }

    pub fn on(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            end_date: Some(date),
            ..Default::default()
        }
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, record: &AttendanceRecord) -> bool {
        self.student_id
            .as_deref()
            .map_or(true, |id| record.student_id == id)
            && self.start_date.map_or(true, |start| record.date >= start)
            && self.end_date.map_or(true, |end| record.date <= end)
    }
}

/// Storage for attendance records.
///
/// `append_unique` must perform the duplicate check and the insert as one
/// atomic step so that concurrent check-ins for the same student and day
/// cannot both succeed.
pub trait AttendanceLog: Send + Sync {
    /// Append a record unless one already exists for its (student_id, date)
    fn append_unique(&self, record: AttendanceRecord) -> AppResult<AttendanceRecord>;

    /// Record for a student on a given day
    fn find(&self, student_id: &str, date: NaiveDate) -> AppResult<Option<AttendanceRecord>>;

    /// Matching records, newest first
    fn query(&self, filter: &RecordFilter) -> AppResult<Vec<AttendanceRecord>>;

    fn count(&self) -> AppResult<usize>;
}

#[derive(Default)]
struct LogState {
    records: Vec<AttendanceRecord>,
    keys: HashSet<(String, NaiveDate)>,
}

/// Process-local attendance log
#[derive(Default)]
pub struct InMemoryAttendanceLog {
    state: RwLock<LogState>,
}

impl InMemoryAttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::Internal("attendance log lock poisoned".to_string())
}

impl AttendanceLog for InMemoryAttendanceLog {
    fn append_unique(&self, record: AttendanceRecord) -> AppResult<AttendanceRecord> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        if !state.keys.insert(record.key()) {
            return Err(AttendanceError::AlreadyRecorded {
                student_id: record.student_id,
                date: record.date,
            }
            .into());
        }
        state.records.push(record.clone());
        Ok(record)
    }

    fn find(&self, student_id: &str, date: NaiveDate) -> AppResult<Option<AttendanceRecord>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .records
            .iter()
            .find(|r| r.student_id == student_id && r.date == date)
            .cloned())
    }

    fn query(&self, filter: &RecordFilter) -> AppResult<Vec<AttendanceRecord>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut rows: Vec<AttendanceRecord> = state
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.time.cmp(&a.time)));
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn count(&self) -> AppResult<usize> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.records.len())
    }
}
