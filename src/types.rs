//! Shared error and result types for Sower.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SowerError>;

/// Sower error types
#[derive(Debug, Error)]
pub enum SowerError {
    /// Record store request could not be sent or completed
    #[error("record store request failed: {0}")]
    Store(String),

    /// Record store answered with a non-success status
    #[error("record store returned {status}: {body}")]
    StoreStatus { status: u16, body: String },

    /// Content library could not be read
    #[error("content library error: {0}")]
    Library(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SowerError {
    fn from(e: reqwest::Error) -> Self {
        Self::Store(e.to_string())
    }
}
