//! Core error types for habitly-core.
//!
//! Mutation functions are total and never fail; these errors cover the
//! collaborators around them (storage, configuration, notification delivery,
//! entitlement) plus the one validating mutation, habit reordering.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitly-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Plan limits and upgrade failures
    #[error("Entitlement error: {0}")]
    Entitlement(#[from] EntitlementError),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A writer panicked while holding the connection
    #[error("Storage connection poisoned")]
    Poisoned,

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Reorder payload is not a permutation of the identity's habit ids
    #[error(
        "Reorder for identity '{identity_id}' is not a permutation \
         (missing: {missing:?}, unexpected: {unexpected:?}, duplicated: {duplicated:?})"
    )]
    ReorderMismatch {
        identity_id: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
        duplicated: Vec<String>,
    },
}

/// Entitlement (free vs. premium) errors surfaced to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// The free plan allows at most `limit` items of this kind
    #[error("Free plan limit reached: {limit} {resource}")]
    LimitReached { resource: String, limit: usize },

    /// Feature requires the premium plan
    #[error("'{0}' requires Habitly Pro")]
    PremiumRequired(String),

    /// The purchase flow could not complete
    #[error("Upgrade failed: {0}")]
    UpgradeFailed(String),
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The delivery collaborator refused or failed the request
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    /// The outbox could not be written
    #[error("Notification outbox error: {0}")]
    Storage(#[from] StorageError),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
