//! Error types for liftmeet

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Rejected user input. Every variant reads as a message for the operator.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date of birth for age group assignment: {0}")]
    InvalidDateOfBirth(String),

    #[error("Attempt value rejected: {0} (max 5 characters, max 99999)")]
    AttemptValue(String),

    #[error("Unknown attempt slot: {0}")]
    UnknownSlot(String),

    #[error("Unknown attempt status: {0}")]
    UnknownStatus(String),

    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    #[error("Invalid bodyweight: {0} (must be a positive number of kg)")]
    InvalidBodyWeight(f64),

    #[error("No valid athletes found. Ensure Name, Team/Club and Date of Birth are provided and correctly formatted")]
    EmptyRoster,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Roster import error: {0}")]
    Import(String),

    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),

    #[error("Athlete not found: {0}")]
    AthleteNotFound(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
