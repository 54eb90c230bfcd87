//! Face capture flow: checking -> capture -> preview -> success, with error exits

use crate::{camera::CameraError, models::face_capture::FaceCaptureEligibility};

use super::TransitionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStep {
    Checking,
    /// Live camera view; `camera_error` holds the remediation message of the
    /// last failed acquisition
    Capture { camera_error: Option<String> },
    Preview { image: String },
    Success { image: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Eligibility(FaceCaptureEligibility),
    CameraFailed(CameraError),
    RetryCamera,
    PhotoTaken(String),
    Retake,
    Confirmed,
    SaveFailed(String),
}

impl CaptureStep {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureStep::Checking => "checking",
            CaptureStep::Capture { .. } => "capture",
            CaptureStep::Preview { .. } => "preview",
            CaptureStep::Success { .. } => "success",
            CaptureStep::Error { .. } => "error",
        }
    }

    pub fn transition(self, event: CaptureEvent) -> Result<CaptureStep, TransitionError> {
        use CaptureEvent as E;
        use CaptureStep as S;

        match (self, event) {
            (S::Checking, E::Eligibility(eligibility)) => Ok(match eligibility {
                FaceCaptureEligibility::Ready { .. } => S::Capture { camera_error: None },
                FaceCaptureEligibility::AlreadyCaptured { capture, .. } => S::Success {
                    image: capture.image,
                },
                FaceCaptureEligibility::NotFound => S::Error {
                    message: "Student not found".to_string(),
                },
                FaceCaptureEligibility::NotMarkedToday { .. } => S::Error {
                    message: "Attendance not marked for today. Please scan the QR code first."
                        .to_string(),
                },
            }),
            (S::Capture { .. }, E::CameraFailed(error)) => Ok(S::Capture {
                camera_error: Some(error.remediation().to_string()),
            }),
            (S::Capture { .. }, E::RetryCamera) => Ok(S::Capture { camera_error: None }),
            (S::Capture { camera_error: None }, E::PhotoTaken(image)) => Ok(S::Preview { image }),
            (S::Preview { .. }, E::Retake) => Ok(S::Capture { camera_error: None }),
            (S::Preview { image }, E::Confirmed) => Ok(S::Success { image }),
            (S::Preview { .. }, E::SaveFailed(message)) => Ok(S::Error { message }),
            (step, event) => Err(TransitionError {
                step: step.name(),
                event: event.name(),
            }),
        }
    }
}

impl CaptureEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureEvent::Eligibility(_) => "eligibility",
            CaptureEvent::CameraFailed(_) => "camera_failed",
            CaptureEvent::RetryCamera => "retry_camera",
            CaptureEvent::PhotoTaken(_) => "photo_taken",
            CaptureEvent::Retake => "retake",
            CaptureEvent::Confirmed => "confirmed",
            CaptureEvent::SaveFailed(_) => "save_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{face_capture::FaceCapture, student::Student};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn student() -> Student {
        Student::new("STU001", "Aarav Sharma", "Grade 10-A")
    }

    #[test]
    fn test_happy_path_with_retake() {
        let step = CaptureStep::Checking
            .transition(CaptureEvent::Eligibility(FaceCaptureEligibility::Ready {
                student: student(),
            }))
            .unwrap()
            .transition(CaptureEvent::PhotoTaken("img-1".into()))
            .unwrap()
            .transition(CaptureEvent::Retake)
            .unwrap()
            .transition(CaptureEvent::PhotoTaken("img-2".into()))
            .unwrap()
            .transition(CaptureEvent::Confirmed)
            .unwrap();

        assert_eq!(step, CaptureStep::Success { image: "img-2".into() });
    }

    #[test]
    fn test_existing_capture_short_circuits() {
        let capture = FaceCapture {
            id: Uuid::new_v4(),
            student_id: "STU001".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            image: "stored".into(),
            captured_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        };
        let step = CaptureStep::Checking
            .transition(CaptureEvent::Eligibility(FaceCaptureEligibility::AlreadyCaptured {
                student: student(),
                capture,
            }))
            .unwrap();
        assert_eq!(step, CaptureStep::Success { image: "stored".into() });
    }

    #[test]
    fn test_not_marked_today_is_an_error() {
        let step = CaptureStep::Checking
            .transition(CaptureEvent::Eligibility(FaceCaptureEligibility::NotMarkedToday {
                student: student(),
            }))
            .unwrap();
        assert_eq!(step.name(), "error");
    }

    #[test]
    fn test_camera_failure_then_retry() {
        let step = CaptureStep::Capture { camera_error: None }
            .transition(CaptureEvent::CameraFailed(CameraError::DeviceBusy))
            .unwrap();
        assert_eq!(
            step,
            CaptureStep::Capture {
                camera_error: Some(CameraError::DeviceBusy.remediation().to_string())
            }
        );

        // No photo can be taken while the camera is failing
        assert!(step
            .clone()
            .transition(CaptureEvent::PhotoTaken("img".into()))
            .is_err());

        let step = step.transition(CaptureEvent::RetryCamera).unwrap();
        assert_eq!(step, CaptureStep::Capture { camera_error: None });
    }

    #[test]
    fn test_save_failure_and_terminal_states() {
        let step = CaptureStep::Preview { image: "img".into() }
            .transition(CaptureEvent::SaveFailed("Face already captured".into()))
            .unwrap();
        assert_eq!(step.name(), "error");

        let err = step.transition(CaptureEvent::Confirmed).unwrap_err();
        assert_eq!(err.step, "error");
        assert_eq!(err.event, "confirmed");

        assert!(CaptureStep::Success { image: "img".into() }
            .transition(CaptureEvent::Retake)
            .is_err());
    }
}
