//! Healing Buds Waitlist
//!
//! Signup flow for visitors from pre-launch regions:
//! - Records the signup through a [`WaitlistRepository`]
//! - Treats duplicate signups as success
//! - Sends a best-effort welcome email through a [`WaitlistMailer`]
//! - Informs the [`RegionGate`](hb_region::RegionGate) once the signup succeeds
//!
//! # Example
//!
//! ```rust,ignore
//! use hb_waitlist::{submit_gate_form, ClientContext, InMemoryWaitlistRepository, LogMailer, WaitlistSignup};
//!
//! let signup = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);
//! let result = submit_gate_form(&mut gate, &signup, "visitor@example.com", &ClientContext::default()).await;
//! ```

// Core modules
pub mod error;
pub mod gate_form;
pub mod mailer;
pub mod repository;
pub mod signup;
pub mod types;

// Re-exports for convenience
pub use error::{MailerError, RepoResult, RepositoryError};
pub use gate_form::{invalid_email_message, is_valid_email, submit_gate_form, GateSubmission};
pub use mailer::{LogMailer, WaitlistMailer};
pub use repository::{InMemoryWaitlistRepository, WaitlistRepository};
pub use signup::{normalize_email, WaitlistSignup, INSERT_FAILED_MESSAGE, UNEXPECTED_MESSAGE};
pub use types::{
    ClientContext, SignupOutcome, SignupRequest, WaitlistEntry, WaitlistSource, WelcomeEmail,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
