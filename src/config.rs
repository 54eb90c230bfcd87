//! Configuration management for the attendance server

use chrono::NaiveTime;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::student::Student;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Latest check-in time (HH:MM) that still counts as PRESENT
    pub cutoff_time: String,
    /// Trailing window, in calendar days, used for student statistics
    pub stats_window_days: u32,
    /// Default number of records returned by the student dashboard
    pub recent_records_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TokenConfig {
    pub prefix: String,
    pub salt: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FaceCaptureConfig {
    /// Upper bound on the decoded image size
    pub max_image_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RosterConfig {
    pub students: Vec<Student>,
    /// Days of generated history before today (0 disables seeding)
    pub mock_history_days: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub face_capture: FaceCaptureConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // e.g. ATTENDANCE_SERVER__PORT=9000
            .add_source(
                Environment::with_prefix("ATTENDANCE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("token.salt", env::var("TOKEN_SALT").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.attendance.validate()?;
        Ok(config)
    }
}

impl AttendanceConfig {
    /// Check the cutoff format and that the stats window covers at least today
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cutoff()?;
        if self.stats_window_days == 0 {
            return Err(ConfigError::Message(
                "attendance.stats_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed cutoff time
    pub fn cutoff(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.cutoff_time.trim(), "%H:%M").map_err(|_| {
            ConfigError::Message(format!(
                "attendance.cutoff_time must be HH:MM, got {:?}",
                self.cutoff_time
            ))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            cutoff_time: "13:00".to_string(),
            stats_window_days: 30,
            recent_records_limit: 10,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            prefix: "ATT-".to_string(),
            salt: "attendance".to_string(),
        }
    }
}

impl Default for FaceCaptureConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            students: default_students(),
            mock_history_days: 30,
        }
    }
}

/// Built-in seed roster
pub fn default_students() -> Vec<Student> {
    [
        ("STU001", "Aarav Sharma", "Grade 10-A"),
        ("STU002", "Diya Patel", "Grade 10-A"),
        ("STU003", "Rohan Mehta", "Grade 10-A"),
        ("STU004", "Ananya Iyer", "Grade 10-B"),
        ("STU005", "Kabir Singh", "Grade 10-B"),
        ("STU006", "Meera Nair", "Grade 10-B"),
        ("STU007", "Arjun Reddy", "Grade 11-A"),
        ("STU008", "Ishita Rao", "Grade 11-A"),
        ("STU009", "Vivaan Gupta", "Grade 11-B"),
        ("STU010", "Saanvi Joshi", "Grade 11-B"),
        ("20221CIT0043", "Amrutha M", "CIT 2022"),
        ("20221CIT0049", "CM Shalini", "CIT 2022"),
        ("20221CIT0151", "Vismaya L", "CIT 2022"),
    ]
    .into_iter()
    .map(|(id, name, grade)| Student::new(id, name, grade))
    .collect()
}
