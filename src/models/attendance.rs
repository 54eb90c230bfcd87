//! Attendance records, statuses and derived statistics

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ---------------------------------------------------------------------------
// AttendanceStatus
// ---------------------------------------------------------------------------

/// Status of a single attendance record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    LatePresent,
    Absent,
}

impl AttendanceStatus {
    /// Status for a check-in at `time`. Checking in exactly at the cutoff is on time.
    pub fn for_check_in(time: NaiveTime, cutoff: NaiveTime) -> Self {
        if truncate_to_minute(time) <= truncate_to_minute(cutoff) {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::LatePresent
        }
    }

    /// Present or late both count toward the attendance ratio.
    pub fn is_attended(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::LatePresent)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::LatePresent => "Late",
            AttendanceStatus::Absent => "Absent",
        };
        write!(f, "{}", label)
    }
}

pub(crate) fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

// ---------------------------------------------------------------------------
// AttendanceRecord
// ---------------------------------------------------------------------------

/// One check-in. At most one exists per (student_id, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub student_id: String,
    pub student_name: String,
    /// Calendar day (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Check-in time (HH:MM)
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:45")]
    pub time: NaiveTime,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn key(&self) -> (String, NaiveDate) {
        (self.student_id.clone(), self.date)
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Per-student aggregate over a window of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentStats {
    /// Number of records considered (days without a record are not counted)
    pub total_days: u32,
    pub days_present: u32,
    pub days_late: u32,
    pub days_absent: u32,
    /// round(100 * (present + late) / total), 0 when there are no records
    pub attendance_percentage: u32,
}

impl StudentStats {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let mut stats = StudentStats::default();
        let mut attended = 0;
        for record in records {
            stats.total_days += 1;
            if record.status.is_attended() {
                attended += 1;
            }
            match record.status {
                AttendanceStatus::Present => stats.days_present += 1,
                AttendanceStatus::LatePresent => stats.days_late += 1,
                AttendanceStatus::Absent => stats.days_absent += 1,
            }
        }
        stats.attendance_percentage = rounded_percentage(attended, stats.total_days);
        stats
    }

    pub fn standing(&self) -> AttendanceStanding {
        AttendanceStanding::from_percentage(self.attendance_percentage)
    }
}

/// Integer percentage rounded half up; 0 for an empty denominator.
fn rounded_percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (part, total) = (u64::from(part), u64::from(total));
    ((200 * part + total) / (2 * total)) as u32
}

/// Band shown next to an attendance percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStanding {
    Excellent,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Critical,
}

impl AttendanceStanding {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => AttendanceStanding::Excellent,
            75..=89 => AttendanceStanding::NeedsImprovement,
            _ => AttendanceStanding::Critical,
        }
    }
}

impl std::fmt::Display for AttendanceStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AttendanceStanding::Excellent => "Excellent",
            AttendanceStanding::NeedsImprovement => "Needs Improvement",
            AttendanceStanding::Critical => "Critical",
        };
        write!(f, "{}", label)
    }
}

/// Counts for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub total_students: u32,
    pub present_today: u32,
    pub late_today: u32,
    /// Students without a check-in today
    pub absent_today: u32,
    /// Share of the roster checked in today, one decimal
    pub attendance_rate: f64,
}

// ---------------------------------------------------------------------------
// Requests and queries
// ---------------------------------------------------------------------------

/// Mark attendance request.
///
/// Neither field is validated up front: a token that is not today's is
/// `InvalidToken` whatever the student ID, and the roster decides whether an
/// ID is known.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
    #[schema(example = "STU001")]
    pub student_id: String,
    #[schema(example = "ATT-3FA91C")]
    pub token: String,
}

/// Filter for record listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct RecordQuery {
    /// Start date, inclusive (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// End date, inclusive (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    pub student_id: Option<String>,
}

/// Query parameters for a student's recent records
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RecentRecordsQuery {
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            student_id: "STU001".into(),
            student_name: "Aarav Sharma".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            status,
        }
    }

    #[test]
    fn test_stats_mixed_history() {
        let records = [
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Present),
            record(AttendanceStatus::LatePresent),
            record(AttendanceStatus::Absent),
        ];
        let stats = StudentStats::from_records(&records);

        assert_eq!(
            stats,
            StudentStats {
                total_days: 4,
                days_present: 2,
                days_late: 1,
                days_absent: 1,
                attendance_percentage: 75,
            }
        );
    }

    #[test]
    fn test_stats_empty_history() {
        let stats = StudentStats::from_records(&[]);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.attendance_percentage, 0);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(1, 3), 33);
    }

    #[test]
    fn test_standing_bands() {
        assert_eq!(AttendanceStanding::from_percentage(100), AttendanceStanding::Excellent);
        assert_eq!(AttendanceStanding::from_percentage(90), AttendanceStanding::Excellent);
        assert_eq!(AttendanceStanding::from_percentage(89), AttendanceStanding::NeedsImprovement);
        assert_eq!(AttendanceStanding::from_percentage(75), AttendanceStanding::NeedsImprovement);
        assert_eq!(AttendanceStanding::from_percentage(74), AttendanceStanding::Critical);
        assert_eq!(AttendanceStanding::from_percentage(0), AttendanceStanding::Critical);
        assert_eq!(AttendanceStanding::NeedsImprovement.to_string(), "Needs Improvement");
    }

    #[test]
    fn test_status_at_cutoff_is_present() {
        let cutoff = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        let at = |h, m, s| NaiveTime::from_hms_opt(h, m, s).unwrap();

        assert_eq!(AttendanceStatus::for_check_in(at(8, 30, 0), cutoff), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::for_check_in(at(13, 0, 0), cutoff), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::for_check_in(at(13, 0, 59), cutoff), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::for_check_in(at(13, 1, 0), cutoff), AttendanceStatus::LatePresent);
    }

    #[test]
    fn test_record_serializes_wire_format() {
        let json = serde_json::to_value(record(AttendanceStatus::LatePresent)).unwrap();
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["status"], "LATE_PRESENT");
    }
}
