//! Common error types for hottrack

use thiserror::Error;

/// Common result type for hottrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the hottrack crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// External chart row rejected by the import adapter
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unsupported export format; carries the offending value
    #[error("Invalid format : {0}")]
    InvalidFormat(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// CSV/spreadsheet writer failure
    #[error("Export error: {0}")]
    Export(String),
}

/// Reasons an external chart row cannot become a [`crate::song::Song`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is not a valid integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("field '{field}' is not a valid ISO date: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("field '{field}' exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}
