//! Error types for waitlist collaborators
//!
//! Neither error type reaches the visitor directly: the signup flow maps
//! them to a fixed set of user-facing messages.

use hb_region::CountryCode;

/// Repository result type
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Waitlist repository errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    /// Email already on the waitlist for this country
    #[error("already signed up: {email} ({country})")]
    Duplicate { email: String, country: CountryCode },

    /// Entry not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Write rejected by storage
    #[error("storage error: {0}")]
    Storage(String),

    /// Storage could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Create duplicate error
    pub fn duplicate(email: impl Into<String>, country: CountryCode) -> Self {
        Self::Duplicate {
            email: email.into(),
            country,
        }
    }

    /// Unique constraint violation
    #[inline]
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Welcome email delivery errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MailerError {
    /// Provider refused the message
    #[error("email rejected: {0}")]
    Rejected(String),

    /// Provider could not be reached
    #[error("email transport error: {0}")]
    Transport(String),
}
