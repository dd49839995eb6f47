//! Error types shared by the store, the entity model and the engine

use thiserror::Error;

/// Failure talking to the persistent store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Rejected timer creation input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("timer name is required")]
    MissingName,

    #[error("timer category is required")]
    MissingCategory,

    #[error("timer duration is required")]
    MissingDuration,

    #[error("invalid duration '{0}': expected a positive whole number of seconds")]
    InvalidDuration(String),
}

/// Errors surfaced by engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Read or write to the store failed. The in-memory change is kept.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("stored '{key}' collection could not be decoded: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode '{key}' collection: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("timer engine is not running")]
    Stopped,
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
