//! Error types for JHONOTE.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using JHONOTE's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for note lifecycle and query operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or empty required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Note absent, or present but owned by someone else
    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No resolvable owner identity
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The underlying note collection is unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bulk operation finished with per-item failures
    #[error("Bulk operation incomplete: {succeeded} succeeded, {failed} failed ({message})")]
    BulkIncomplete {
        succeeded: usize,
        failed: usize,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors that mean "the note is not there for this caller".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NoteNotFound(_) | Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
