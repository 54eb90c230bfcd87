//! Business logic services

pub mod attendance;
pub mod face_capture;
pub mod students;
pub mod token;

use std::sync::Arc;

use crate::{
    clock::Clock,
    config::AppConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub attendance: attendance::AttendanceService,
    pub face_capture: face_capture::FaceCaptureService,
    pub students: students::StudentsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        config
            .attendance
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let cutoff = config
            .attendance
            .cutoff()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let tokens = token::TokenService::new(&config.token);

        let attendance = attendance::AttendanceService::new(
            repository.clone(),
            tokens,
            clock,
            cutoff,
            config.attendance.stats_window_days,
        );

        Ok(Self {
            face_capture: face_capture::FaceCaptureService::new(
                repository.clone(),
                attendance.clone(),
                &config.face_capture,
            ),
            students: students::StudentsService::new(repository),
            attendance,
        })
    }
}
