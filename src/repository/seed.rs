//! Deterministic mock attendance history for demo dashboards

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use sha2::{Digest, Sha256};

use crate::models::attendance::{AttendanceRecord, AttendanceStatus};

use super::roster::Roster;

const LAST_MINUTE: i64 = 23 * 60 + 59;

fn time_at_minute(minute: i64) -> NaiveTime {
    NaiveTime::MIN + Duration::minutes(minute.clamp(0, LAST_MINUTE))
}

/// Records for every weekday in the `days` days before `today`.
///
/// The same roster, dates and salt always yield the same history. Some
/// student/day pairs get no record at all.
pub fn mock_history(
    roster: &Roster,
    today: NaiveDate,
    days: u32,
    cutoff: NaiveTime,
    salt: &str,
) -> Vec<AttendanceRecord> {
    let mut records = Vec::new();
    let cutoff_minute = i64::from(cutoff.num_seconds_from_midnight() / 60);

    for offset in (1..=i64::from(days)).rev() {
        let date = today - Duration::days(offset);
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        for student in roster.all() {
            let digest = Sha256::digest(format!("{}:{}:{}", salt, student.id, date).as_bytes());
            let roll = digest[0] % 100;
            let jitter = i64::from(digest[1]);

            // Present stays within [00:00, cutoff], late within (cutoff, 23:59]
            let (status, time) = match roll {
                0..=69 => (
                    AttendanceStatus::Present,
                    time_at_minute(cutoff_minute - 30 - jitter % 240),
                ),
                70..=84 if cutoff_minute < LAST_MINUTE => (
                    AttendanceStatus::LatePresent,
                    time_at_minute(cutoff_minute + 1 + jitter % 120),
                ),
                70..=84 => continue,
                85..=94 => (AttendanceStatus::Absent, NaiveTime::MIN),
                _ => continue,
            };

            records.push(AttendanceRecord {
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                date,
                time,
                status,
            });
        }
    }

    records
}
