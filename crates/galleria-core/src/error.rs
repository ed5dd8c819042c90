//! Error types for galleria.

use thiserror::Error;

/// Result type alias using galleria's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for galleria operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row returned by the backing store failed validation
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input supplied by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the failure originated in the backing store rather than
    /// in the caller's request.
    pub fn is_backing_failure(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::InvalidRow(_) | Error::Internal(_)
        )
    }
}
