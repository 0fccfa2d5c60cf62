//! Healing Buds Password Security
//!
//! Client-side password checks for signup and password-change forms:
//! - Strength scoring with per-requirement feedback
//! - Validation against the account password policy
//! - Breached-password lookup via the Pwned Passwords range API
//!
//! The breach lookup uses k-anonymity: only the first five hex characters of
//! the SHA-1 digest are sent; matching happens locally.
//!
//! # Example
//!
//! ```rust
//! use hb_password::{check_strength, validate_password, StrengthLabel};
//!
//! let strength = check_strength("Correct-Horse-42");
//! assert_eq!(strength.label, StrengthLabel::VeryStrong);
//! assert!(validate_password("Correct-Horse-42").is_valid);
//! ```

pub mod error;
pub mod pwned;
pub mod strength;

pub use error::{PasswordError, PasswordResult};
pub use pwned::{
    parse_range_response, sha1_hex, HibpClient, HibpConfig, PwnedChecker, PwnedResult,
    RangeClient, CHECK_FAILED_MESSAGE,
};
pub use strength::{
    check_strength, format_breach_count, validate_password, PasswordStrength, PasswordValidation,
    Requirement, StrengthLabel,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
