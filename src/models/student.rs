//! Student model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Student {
    /// Student ID, stored upper-case (e.g. STU001)
    #[schema(example = "STU001")]
    pub id: String,
    pub name: String,
    /// Grade or class label
    pub grade: String,
}

impl Student {
    pub fn new(id: impl AsRef<str>, name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            id: normalize_student_id(id.as_ref()),
            name: name.into(),
            grade: grade.into(),
        }
    }
}

/// Student IDs are compared trimmed and upper-cased.
pub fn normalize_student_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}
