//! Core error types for commitly-core.
//!
//! This module defines the error hierarchy using thiserror. Invalid
//! state transitions get their own `StateError` family because they
//! signal a caller-side logic mistake rather than a recoverable
//! runtime condition.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for commitly-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Illegal state transitions (resume without pause, freeze when disabled, ...)
    #[error("Invalid state: {0}")]
    State(#[from] StateError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Illegal lifecycle transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Resume requested on a goal that is not paused
    #[error("goal is not paused")]
    NotPaused,

    /// Pause requested on a goal that is already paused
    #[error("goal is already paused")]
    AlreadyPaused,

    /// Streak freeze requested but freezing is disabled by configuration
    #[error("streak freezing is not enabled")]
    FreezeDisabled,

    /// Mutation requested on a goal that already reached its end
    #[error("goal '{0}' is already completed")]
    GoalCompleted(String),

    /// Goal id does not exist in the store
    #[error("goal '{0}' not found")]
    GoalNotFound(String),

    /// Activity id does not belong to the goal
    #[error("activity '{activity}' does not belong to goal '{goal}'")]
    UnknownActivity { goal: String, activity: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Not a calendar date in YYYY-MM-DD form
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(DatabaseError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
