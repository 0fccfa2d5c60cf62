//! Error types for the region gate
//!
//! Resolution itself never fails: unmatched inputs fall through to a coded
//! default. Errors only surface for:
//! - Country codes supplied by callers
//! - Region configuration loading and validation
//! - Developer tools requested outside dev mode

use std::path::PathBuf;

/// Errors raised while loading or validating a [`RegionConfig`](crate::RegionConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Country listed as both operational and pre-launch
    #[error("country {0} is listed as both operational and pre-launch")]
    OverlappingRegions(String),

    /// Default country must be a live market
    #[error("default country {0} is not in the operational set")]
    DefaultNotOperational(String),

    /// The global sentinel cannot be classified as a market
    #[error("reserved code {0} cannot be listed as a market")]
    ReservedCode(String),

    /// Domain suffix rules must start with a dot
    #[error("invalid domain suffix: '{0}'")]
    InvalidSuffix(String),

    /// Host patterns must be non-empty
    #[error("empty host pattern in {0}")]
    EmptyPattern(&'static str),

    /// TOML syntax or schema error
    #[error("parse error: {0}")]
    Parse(String),

    /// IO error reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Main region gate error type
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// Value is not a syntactically valid country code
    #[error("invalid country code: '{0}'")]
    InvalidCountryCode(String),

    /// Page URL could not be parsed
    #[error("invalid url '{url}': {message}")]
    InvalidUrl {
        /// Input as given
        url: String,
        /// Parser message
        message: String,
    },

    /// Developer tools requested outside dev mode
    #[error("developer tools are disabled outside dev mode")]
    DevToolsDisabled,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RegionError {
    /// Create invalid url error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for region operations
pub type RegionResult<T> = Result<T, RegionError>;
