//! Error types for the gym_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gym_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workout template lookup failure
    #[error("Workout template not found: {0}")]
    TemplateNotFound(String),

    /// Exercise lookup failure within a template
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),

    /// Backup document rejected before any write
    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    /// Storage-layer failure
    #[error("Storage error: {0}")]
    Storage(String),
}
