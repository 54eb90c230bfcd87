//! Data models for the attendance server

pub mod attendance;
pub mod face_capture;
pub mod student;

// Re-export commonly used types
pub use attendance::{
    AttendanceRecord, AttendanceStanding, AttendanceStatus, DashboardStats, StudentStats,
};
pub use face_capture::{FaceCapture, FaceCaptureEligibility};
pub use student::Student;
