//! Core error types for grocery-planner-core.
//!
//! This module defines the error hierarchy using thiserror. Generation
//! failures (bad configuration, unparseable windows) and provider failures
//! all surface as [`CoreError`] so callers can match on a single type.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for grocery-planner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A requested record does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Preconditions on preferences or scheduler settings were violated
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A time-of-day, weekday or timestamp string could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A calendar, store or travel-time provider failed
    #[error("Provider error for '{provider}': {message}")]
    Provider {
        provider: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// True for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

/// Parse failures for user-supplied or persisted strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid time of day '{value}' (expected HH:MM)")]
    InvalidTimeOfDay { value: String },

    #[error("invalid weekday '{value}'")]
    InvalidWeekday { value: String },

    #[error("invalid timestamp for '{field}': '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine where to keep data
    #[error("Cannot resolve data directory: {0}")]
    DataDir(String),
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
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
