//! Password security errors

use thiserror::Error;

/// Breach lookup failures
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Request could not be sent or the body could not be read
    #[error("range request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Range endpoint answered with a non-success status
    #[error("range API returned {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },

    /// Hash prefix is not five hex characters
    #[error("invalid hash prefix: {0}")]
    InvalidPrefix(String),
}

impl PasswordError {
    /// Create unexpected status error
    #[must_use]
    pub fn unexpected_status(status: u16) -> Self {
        Self::UnexpectedStatus { status }
    }
}

/// Result type for breach lookups
pub type PasswordResult<T> = Result<T, PasswordError>;
