//! Repository layer: roster snapshot and in-process stores

pub mod attendance;
pub mod face_captures;
pub mod roster;
pub mod seed;

use std::sync::Arc;

pub use attendance::{AttendanceLog, InMemoryAttendanceLog, RecordFilter};
pub use face_captures::{FaceCaptureStore, InMemoryFaceCaptureStore};
pub use roster::Roster;

/// Main repository struct holding the roster and the record stores
#[derive(Clone)]
pub struct Repository {
    pub roster: Arc<Roster>,
    pub attendance: Arc<dyn AttendanceLog>,
    pub face_captures: Arc<dyn FaceCaptureStore>,
}

impl Repository {
    /// Repository backed by in-memory stores
    pub fn new(roster: Roster) -> Self {
        Self::with_stores(
            roster,
            Arc::new(InMemoryAttendanceLog::new()),
            Arc::new(InMemoryFaceCaptureStore::new()),
        )
    }

    pub fn with_stores(
        roster: Roster,
        attendance: Arc<dyn AttendanceLog>,
        face_captures: Arc<dyn FaceCaptureStore>,
    ) -> Self {
        Self {
            roster: Arc::new(roster),
            attendance,
            face_captures,
        }
    }
}
