// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Empty schedule input!")]
    EmptySchedule,
    #[error("Invalid input for holidays entered ({0}). Holiday count must be between 0 to 14.")]
    HolidayCountOutOfRange(i64),
    #[error("Employee not found in roster: {0}")]
    UnknownEmployee(String),
    #[error("Missing custom employee field: {0}")]
    MissingCustomField(&'static str),
    #[error("Invalid gender code '{0}', expected M or F")]
    InvalidGender(String),
    // Shift finding requires a shift-time map built from the same grid
    #[error("No shift-time context resolved for row {row}; shift-time map was built from a different grid")]
    MissingShiftTimeContext { row: usize },
    #[error("File I/O error ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Timesheet export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid environment configuration: {0}")]
    Config(#[from] envy::Error),
}

impl ScheduleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScheduleError::Io {
            path: path.into(),
            source,
        }
    }
}
