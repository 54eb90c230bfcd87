//! Face capture after check-in

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    config::FaceCaptureConfig,
    error::{AppError, AppResult},
    models::face_capture::{FaceCapture, FaceCaptureEligibility},
    repository::Repository,
};

use super::attendance::AttendanceService;

#[derive(Clone)]
pub struct FaceCaptureService {
    repository: Repository,
    attendance: AttendanceService,
    max_image_bytes: usize,
}

impl FaceCaptureService {
    pub fn new(
        repository: Repository,
        attendance: AttendanceService,
        config: &FaceCaptureConfig,
    ) -> Self {
        Self {
            repository,
            attendance,
            max_image_bytes: config.max_image_bytes,
        }
    }

    /// Decide which step the capture flow starts in
    pub fn eligibility(&self, student_id: &str) -> AppResult<FaceCaptureEligibility> {
        self.eligibility_on(student_id, self.attendance.now().date())
    }

    fn eligibility_on(&self, student_id: &str, date: NaiveDate) -> AppResult<FaceCaptureEligibility> {
        let Some(student) = self.repository.roster.get(student_id).cloned() else {
            return Ok(FaceCaptureEligibility::NotFound);
        };

        if self.repository.attendance.find(&student.id, date)?.is_none() {
            return Ok(FaceCaptureEligibility::NotMarkedToday { student });
        }

        match self.repository.face_captures.get(&student.id, date)? {
            Some(capture) => Ok(FaceCaptureEligibility::AlreadyCaptured { student, capture }),
            None => Ok(FaceCaptureEligibility::Ready { student }),
        }
    }

    /// Today's capture, if any
    pub fn today(&self, student_id: &str) -> AppResult<Option<FaceCapture>> {
        let student = self.require_student(student_id)?;
        let today = self.attendance.now().date();
        self.repository.face_captures.get(&student, today)
    }

    /// Store today's capture. Only allowed once per day and after check-in.
    pub fn save(&self, student_id: &str, image: &str) -> AppResult<FaceCapture> {
        self.save_at(student_id, image, self.attendance.now())
    }

    /// Store a capture taken at `now`; eligibility and the stored date both use `now`
    pub fn save_at(&self, student_id: &str, image: &str, now: NaiveDateTime) -> AppResult<FaceCapture> {
        let student = match self.eligibility_on(student_id, now.date())? {
            FaceCaptureEligibility::Ready { student } => student,
            FaceCaptureEligibility::NotFound => {
                return Err(AppError::NotFound(format!("Student {} not found", student_id.trim())))
            }
            FaceCaptureEligibility::NotMarkedToday { student } => {
                return Err(AppError::BusinessRule(format!(
                    "Attendance not marked today for {}",
                    student.id
                )))
            }
            FaceCaptureEligibility::AlreadyCaptured { student, .. } => {
                return Err(AppError::Conflict(format!(
                    "Face already captured today for {}",
                    student.id
                )))
            }
        };

        let bytes = decode_image_payload(image)?;
        if bytes.len() > self.max_image_bytes {
            return Err(AppError::Validation(format!(
                "Image is {} bytes, limit is {}",
                bytes.len(),
                self.max_image_bytes
            )));
        }

        let capture = self.repository.face_captures.insert_once(FaceCapture {
            id: Uuid::new_v4(),
            student_id: student.id.clone(),
            date: now.date(),
            image: image.to_string(),
            captured_at: now,
        })?;

        tracing::info!(
            student_id = %capture.student_id,
            date = %capture.date,
            bytes = bytes.len(),
            "Face capture stored"
        );
        Ok(capture)
    }

    fn require_student(&self, student_id: &str) -> AppResult<String> {
        self.repository
            .roster
            .get(student_id)
            .map(|s| s.id.clone())
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", student_id.trim())))
    }
}

/// Decode a data URL (`data:image/jpeg;base64,...`) or bare base64 payload
pub fn decode_image_payload(image: &str) -> AppResult<Vec<u8>> {
    let encoded = match image.trim().strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(|| {
                AppError::Validation("Invalid image: data URL has no payload".to_string())
            })?;
            if !header.ends_with(";base64") {
                return Err(AppError::Validation(
                    "Invalid image: data URL must be base64 encoded".to_string(),
                ));
            }
            data
        }
        None => image,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::Validation(format!("Invalid image: {}", e)))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Invalid image: empty payload".to_string()));
    }
    Ok(bytes)
}
