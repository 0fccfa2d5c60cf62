//! Breached-password lookup (k-anonymity range API)
//!
//! # Protocol
//! 1. SHA-1 the password, upper-case hex
//! 2. `GET {base}/range/{first five hex chars}` with `Add-Padding: true`
//! 3. Scan the `SUFFIX:COUNT` lines for the remaining 35 chars
//!
//! Padding rows carry a count of 0 and never count as a breach.

use crate::error::{PasswordError, PasswordResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::sync::Arc;
use std::time::Duration;

/// Shown when the lookup could not be completed
pub const CHECK_FAILED_MESSAGE: &str = "Unable to check password security";

const PREFIX_LEN: usize = 5;

/// Lookup result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PwnedResult {
    /// Password appears in a known breach
    pub is_pwned: bool,
    /// Times the password appeared in known breaches
    pub count: u64,
    /// Set when the lookup could not be completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PwnedResult {
    fn found(count: u64) -> Self {
        Self {
            is_pwned: count > 0,
            count,
            error: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            is_pwned: false,
            count: 0,
            error: Some(CHECK_FAILED_MESSAGE.to_string()),
        }
    }
}

/// Upper-case hex SHA-1 digest
#[must_use]
pub fn sha1_hex(password: &str) -> String {
    hex::encode_upper(Sha1::digest(password.as_bytes()))
}

/// Count for `suffix` in a range response body, if listed
#[must_use]
pub fn parse_range_response(body: &str, suffix: &str) -> Option<u64> {
    body.lines().find_map(|line| {
        let (hash, count) = line.split_once(':')?;
        hash.trim()
            .eq_ignore_ascii_case(suffix)
            .then(|| count.trim().parse().unwrap_or(0))
    })
}

/// Fetches one hash-prefix range
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RangeClient: Send + Sync {
    /// Raw response body for a five-character hex prefix
    async fn fetch_range(&self, prefix: &str) -> PasswordResult<String>;
}

#[async_trait]
impl<T: RangeClient + ?Sized> RangeClient for Arc<T> {
    async fn fetch_range(&self, prefix: &str) -> PasswordResult<String> {
        (**self).fetch_range(prefix).await
    }
}

/// Range API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HibpConfig {
    /// API root, without the `/range` path
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for HibpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pwnedpasswords.com".to_string(),
            timeout_secs: 10,
            user_agent: concat!("healing-buds/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HibpConfig {
    /// With API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// HTTP range client
#[derive(Debug, Clone)]
pub struct HibpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HibpClient {
    /// Build client
    ///
    /// # Errors
    /// Returns [`PasswordError::Http`] if the HTTP client cannot be built.
    pub fn new(config: HibpConfig) -> PasswordResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint for a prefix
    #[must_use]
    pub fn range_url(&self, prefix: &str) -> String {
        format!("{}/range/{}", self.base_url, prefix)
    }
}

#[async_trait]
impl RangeClient for HibpClient {
    async fn fetch_range(&self, prefix: &str) -> PasswordResult<String> {
        if prefix.len() != PREFIX_LEN || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PasswordError::InvalidPrefix(prefix.to_string()));
        }

        let resp = self
            .client
            .get(self.range_url(prefix))
            .header("Add-Padding", "true")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PasswordError::unexpected_status(status.as_u16()));
        }

        Ok(resp.text().await?)
    }
}

/// Breach checker over a [`RangeClient`]
#[derive(Debug, Clone)]
pub struct PwnedChecker<C> {
    client: C,
}

impl<C: RangeClient> PwnedChecker<C> {
    /// Create checker
    #[must_use]
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Look up a password
    ///
    /// Never fails: lookup errors are logged and reported through
    /// [`PwnedResult::error`] with `is_pwned: false`.
    pub async fn check(&self, password: &str) -> PwnedResult {
        let hash = sha1_hex(password);
        let (prefix, suffix) = hash.split_at(PREFIX_LEN);

        match self.client.fetch_range(prefix).await {
            Ok(body) => {
                let result = PwnedResult::found(parse_range_response(&body, suffix).unwrap_or(0));
                tracing::debug!("Range {} checked, pwned: {}", prefix, result.is_pwned);
                result
            }
            Err(err) => {
                tracing::error!("Error checking password against breach database: {}", err);
                PwnedResult::unavailable()
            }
        }
    }
}

impl PwnedChecker<HibpClient> {
    /// Checker against the public range API
    ///
    /// # Errors
    /// Returns [`PasswordError::Http`] if the HTTP client cannot be built.
    pub fn hibp(config: HibpConfig) -> PasswordResult<Self> {
        Ok(Self::new(HibpClient::new(config)?))
    }
}
