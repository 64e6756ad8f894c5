//! Common error types for whinv

use thiserror::Error;

/// Common result type for whinv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the whinv binaries
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid required field on create/update
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation targets a record that does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing store failure (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
