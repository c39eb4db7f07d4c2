//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert store, I/O and serialization errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` so `AppError` stays cloneable.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Error originating from the store (`sqlx`).
    #[error("Database Error: {0}")]
    Db(Arc<sqlx::Error>),

    /// Error writing command output.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error rendering a record as JSON (`serde_json`).
    #[error("JSON Error: {0}")]
    Json(Arc<serde_json::Error>),

    /// An insert that must succeed was rejected by a store constraint.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid configuration, e.g. an unparsable database URL.
    #[error("Configuration Error: {0}")]
    Config(String),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Db(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(Arc::new(err))
    }
}

/// Returns `true` when `err` is a uniqueness violation reported by SQLite.
///
/// Checks the extended result codes `SQLITE_CONSTRAINT_UNIQUE` (2067) and
/// `SQLITE_CONSTRAINT_PRIMARYKEY` (1555), falling back to the message text.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.code().as_deref(), Some("2067") | Some("1555"))
                || db_err.message().starts_with("UNIQUE constraint failed")
        },
        _ => false,
    }
}
