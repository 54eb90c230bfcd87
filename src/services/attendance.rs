//! Attendance evaluation: check-ins, daily status and statistics

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::{
    clock::Clock,
    error::{AppResult, AttendanceError},
    models::{
        attendance::{
            truncate_to_minute, AttendanceRecord, AttendanceStatus, DashboardStats, RecordQuery,
            StudentStats,
        },
        student::{normalize_student_id, Student},
    },
    repository::{RecordFilter, Repository},
};

use super::token::TokenService;

#[derive(Clone)]
pub struct AttendanceService {
    repository: Repository,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
    cutoff: NaiveTime,
    stats_window_days: u32,
}

impl AttendanceService {
    pub fn new(
        repository: Repository,
        tokens: TokenService,
        clock: Arc<dyn Clock>,
        cutoff: NaiveTime,
        stats_window_days: u32,
    ) -> Self {
        Self {
            repository,
            tokens,
            clock,
            cutoff,
            stats_window_days,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn cutoff(&self) -> NaiveTime {
        self.cutoff
    }

    /// Today's token
    pub fn todays_token(&self) -> String {
        self.tokens.token_for(self.now().date())
    }

    /// Mark attendance at the current clock time
    pub fn mark_attendance(&self, student_id: &str, token: &str) -> AppResult<AttendanceRecord> {
        self.mark_attendance_at(student_id, token, self.now())
    }

    /// Validate a check-in and append its record.
    ///
    /// The token is checked before the student so that a wrong token is
    /// always reported as `InvalidToken`.
    pub fn mark_attendance_at(
        &self,
        student_id: &str,
        token: &str,
        now: NaiveDateTime,
    ) -> AppResult<AttendanceRecord> {
        let student_id = normalize_student_id(student_id);
        let today = now.date();

        if !self.tokens.verify(today, token) {
            tracing::info!(student_id = %student_id, date = %today, "Rejected check-in: invalid token");
            return Err(AttendanceError::InvalidToken.into());
        }

        let student = self.student(&student_id)?;

        let time = truncate_to_minute(now.time());
        let status = AttendanceStatus::for_check_in(time, self.cutoff);
        let record = self.repository.attendance.append_unique(AttendanceRecord {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            date: today,
            time,
            status,
        })?;

        tracing::info!(
            student_id = %record.student_id,
            date = %record.date,
            status = ?record.status,
            "Attendance recorded"
        );
        Ok(record)
    }

    /// Whether the student has a record for today
    pub fn has_marked_attendance_today(&self, student_id: &str) -> AppResult<bool> {
        let today = self.now().date();
        Ok(self
            .repository
            .attendance
            .find(&normalize_student_id(student_id), today)?
            .is_some())
    }

    /// Statistics over the trailing window ending today
    pub fn student_stats(&self, student_id: &str) -> AppResult<StudentStats> {
        let student = self.student(student_id)?;
        let today = self.now().date();
        let window_start =
            today - Duration::days(i64::from(self.stats_window_days.saturating_sub(1)));

        let records = self
            .repository
            .attendance
            .query(&RecordFilter::student(student.id.clone()).between(window_start, today))?;

        Ok(StudentStats::from_records(&records))
    }

    /// Counts for the admin dashboard
    pub fn today_stats(&self) -> AppResult<DashboardStats> {
        let today = self.now().date();
        let records = self.repository.attendance.query(&RecordFilter::on(today))?;

        let present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as u32;
        let late = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::LatePresent)
            .count() as u32;
        let total = self.repository.roster.len() as u32;
        let checked_in = present + late;

        let attendance_rate = if total == 0 {
            0.0
        } else {
            (f64::from(checked_in) * 1000.0 / f64::from(total)).round() / 10.0
        };

        Ok(DashboardStats {
            date: today,
            total_students: total,
            present_today: present,
            late_today: late,
            absent_today: total.saturating_sub(checked_in),
            attendance_rate,
        })
    }

    /// Today's records, newest first
    pub fn today_records(&self) -> AppResult<Vec<AttendanceRecord>> {
        self.repository
            .attendance
            .query(&RecordFilter::on(self.now().date()))
    }

    /// Records matching a report query, newest first
    pub fn report(&self, query: &RecordQuery) -> AppResult<Vec<AttendanceRecord>> {
        let filter = RecordFilter {
            student_id: query
                .student_id
                .as_deref()
                .map(normalize_student_id)
                .filter(|id| !id.is_empty()),
            start_date: query.start_date,
            end_date: query.end_date,
            limit: None,
        };
        self.repository.attendance.query(&filter)
    }

    /// Most recent records of one student
    pub fn recent_records(&self, student_id: &str, limit: usize) -> AppResult<Vec<AttendanceRecord>> {
        let student = self.student(student_id)?;
        self.repository
            .attendance
            .query(&RecordFilter::student(student.id.clone()).limit(limit))
    }

    fn student(&self, student_id: &str) -> AppResult<&Student> {
        self.repository
            .roster
            .get(student_id)
            .ok_or_else(|| AttendanceError::UnknownStudent(normalize_student_id(student_id)).into())
    }
}
