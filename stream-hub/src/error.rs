//! Application-wide error types.

use thiserror::Error;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseSqlx(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    #[error("Stream {id} already running")]
    AlreadyRunning { id: String },

    #[error("{entity_type} {id} was modified concurrently, retry the operation")]
    Conflict { entity_type: String, id: String },

    #[error("Invalid state transition: cannot transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn already_running(id: impl Into<String>) -> Self {
        Self::AlreadyRunning { id: id.into() }
    }

    pub fn conflict(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Stable machine-readable tag for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DatabaseSqlx(_) | Self::Database(_) => "database_error",
            Self::Serialization(_) => "serialization_error",
            Self::NotFound { .. } => "not_found",
            Self::AlreadyRunning { .. } => "already_running",
            Self::Conflict { .. } => "conflict",
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::Validation(_) => "validation_error",
            Self::Configuration(_) => "configuration_error",
            Self::Other(_) => "internal_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the request itself was at fault (unknown id, bad input, a
    /// state the stream is already in) rather than the hub.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::AlreadyRunning { .. }
                | Self::Validation(_)
                | Self::InvalidStateTransition { .. }
        )
    }
}
