use crate::Planner;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("preset '{0}' not found")]
    NotFound(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Named presets: plan settings together with project measurements.
pub trait PresetStore {
    fn save_preset(&self, name: &str, planner: &Planner) -> PersistenceResult<()>;
    fn load_preset(&self, name: &str) -> PersistenceResult<Option<Planner>>;
    /// Preset names in ascending order.
    fn list_presets(&self) -> PersistenceResult<Vec<String>>;
    /// Returns whether a preset was removed.
    fn delete_preset(&self, name: &str) -> PersistenceResult<bool>;

    fn fetch_preset(&self, name: &str) -> PersistenceResult<Planner> {
        self.load_preset(name)?
            .ok_or_else(|| PersistenceError::NotFound(name.trim().to_string()))
    }
}

/// Trimmed preset name; rejects blank names.
pub fn normalize_preset_name(name: &str) -> PersistenceResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PersistenceError::InvalidData(
            "preset name must not be empty".into(),
        ));
    }
    Ok(trimmed)
}

pub fn validate_preset(planner: &Planner) -> PersistenceResult<()> {
    planner
        .validate()
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{JsonPresetStore, save_sessions_to_csv, write_sessions_csv};
