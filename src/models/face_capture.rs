//! Face capture model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::student::Student;

/// Photo taken after a successful check-in; one per student and day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FaceCapture {
    pub id: Uuid,
    pub student_id: String,
    pub date: NaiveDate,
    /// Image as submitted (data URL or bare base64)
    pub image: String,
    pub captured_at: NaiveDateTime,
}

/// Save face capture request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveFaceCapture {
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,
}

/// Whether a student may capture a photo today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FaceCaptureEligibility {
    NotFound,
    NotMarkedToday { student: Student },
    AlreadyCaptured { student: Student, capture: FaceCapture },
    Ready { student: Student },
}
