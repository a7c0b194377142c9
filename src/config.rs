use crate::project::PlanMode;
use crate::timezone::CalendarTimezone;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const WEEKS_RANGE: RangeInclusive<u32> = 1..=52;
pub const SESSIONS_PER_WEEK_RANGE: RangeInclusive<u32> = 1..=14;
pub const SESSION_HOUR_RANGE: RangeInclusive<u32> = 6..=22;

pub const HTTP_ADDR_ENV: &str = "CROCHET_PLANNER_HTTP_ADDR";
pub const LOG_LEVEL_ENV: &str = "CROCHET_PLANNER_LOG";
pub const PRESETS_PATH_ENV: &str = "CROCHET_PLANNER_PRESETS";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error(transparent)]
    UnknownTimezone(#[from] crate::timezone::UnknownTimezone),
    #[error("{field} must be between {min} and {max} (got {value})")]
    MeasurementOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("stitch multiple must be one of 1, 2, 3, 4, 6 or 8 (got {0})")]
    UnsupportedMultiple(u32),
    #[error("unknown plan mode '{0}'")]
    UnknownPlanMode(String),
    #[error("unknown stitch '{0}' (expected sc, hdc, dc, tr or granny)")]
    UnknownStitch(String),
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Milestone plan inputs, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSettings {
    pub mode: PlanMode,
    pub start_date: NaiveDate,
    pub weeks: u32,
    pub sessions_per_week: u32,
    pub session_hour: u32,
    pub timezone: String,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self::starting(Local::now().date_naive())
    }
}

impl PlanSettings {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            mode: PlanMode::Beanie,
            start_date,
            weeks: 4,
            sessions_per_week: 3,
            session_hour: 19,
            timezone: CalendarTimezone::Chicago.id().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("weeks", self.weeks, WEEKS_RANGE)?;
        check_range(
            "sessions_per_week",
            self.sessions_per_week,
            SESSIONS_PER_WEEK_RANGE,
        )?;
        check_range("session_hour", self.session_hour, SESSION_HOUR_RANGE)?;
        self.calendar_timezone()?;
        Ok(())
    }

    pub fn calendar_timezone(&self) -> Result<CalendarTimezone, ConfigError> {
        Ok(CalendarTimezone::from_str(&self.timezone)?)
    }

    /// Download name for the exported calendar.
    pub fn file_name(&self) -> String {
        format!("crochet_{}_milestones.ics", self.mode.as_str())
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Process-level settings for the binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub http_addr: SocketAddr,
    pub log_level: String,
    pub presets_path: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            presets_path: PathBuf::from("presets.json"),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(addr) = lookup(HTTP_ADDR_ENV) {
            config.http_addr = addr.parse().map_err(|err: std::net::AddrParseError| {
                ConfigError::InvalidEnv {
                    name: HTTP_ADDR_ENV,
                    value: addr.clone(),
                    reason: err.to_string(),
                }
            })?;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        if let Some(path) = lookup(PRESETS_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            config.presets_path = PathBuf::from(path);
        }
        Ok(config)
    }
}
