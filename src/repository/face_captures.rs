//! Face capture storage

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::face_capture::FaceCapture,
};

/// Write-once store keyed by (student_id, date)
pub trait FaceCaptureStore: Send + Sync {
    fn insert_once(&self, capture: FaceCapture) -> AppResult<FaceCapture>;

    fn get(&self, student_id: &str, date: NaiveDate) -> AppResult<Option<FaceCapture>>;
}

#[derive(Default)]
pub struct InMemoryFaceCaptureStore {
    captures: RwLock<HashMap<(String, NaiveDate), FaceCapture>>,
}

impl InMemoryFaceCaptureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FaceCaptureStore for InMemoryFaceCaptureStore {
    fn insert_once(&self, capture: FaceCapture) -> AppResult<FaceCapture> {
        let mut captures = self
            .captures
            .write()
            .map_err(|_| AppError::Internal("face capture lock poisoned".to_string()))?;

        let key = (capture.student_id.clone(), capture.date);
        if captures.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "Face already captured for {} on {}",
                capture.student_id, capture.date
            )));
        }
        captures.insert(key, capture.clone());
        Ok(capture)
    }

    fn get(&self, student_id: &str, date: NaiveDate) -> AppResult<Option<FaceCapture>> {
        let captures = self
            .captures
            .read()
            .map_err(|_| AppError::Internal("face capture lock poisoned".to_string()))?;
        Ok(captures.get(&(student_id.to_string(), date)).cloned())
    }
}
