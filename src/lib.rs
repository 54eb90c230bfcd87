//! Attendance server
//!
//! Students check in with their ID and a token derived from the calendar
//! day; check-ins after the cutoff are marked late. The server keeps the
//! roster and an append-only attendance log in memory and serves per-student
//! statistics, daily dashboards and an optional face capture step over a REST
//! JSON API.

use std::sync::Arc;

pub mod api;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use clock::Clock;
use repository::{seed, Repository, Roster};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the roster, seed mock history and wire the services
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let roster = Roster::new(config.roster.students.clone())?;
        let repository = Repository::new(roster);

        if config.roster.mock_history_days > 0 {
            let cutoff = config
                .attendance
                .cutoff()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            let history = seed::mock_history(
                &repository.roster,
                clock.now().date(),
                config.roster.mock_history_days,
                cutoff,
                &config.token.salt,
            );
            let seeded = history.len();
            for record in history {
                repository.attendance.append_unique(record)?;
            }
            tracing::info!(
                records = seeded,
                days = config.roster.mock_history_days,
                "Seeded mock attendance history"
            );
        }

        let services = services::Services::new(repository, &config, clock)?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
