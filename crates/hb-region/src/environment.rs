//! Browsing context capability
//!
//! Hostname, query string and build flags are injected instead of read from
//! globals, so resolution stays a pure function of its inputs.

use crate::error::RegionError;
use url::Url;

/// Current browsing context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    hostname: String,
    query: Vec<(String, String)>,
    dev_build: bool,
}

impl Environment {
    /// Create for a hostname (lower-cased, port stripped)
    #[must_use]
    pub fn new(hostname: impl AsRef<str>) -> Self {
        Self {
            hostname: normalize_host(hostname.as_ref()),
            query: Vec::new(),
            dev_build: false,
        }
    }

    /// Build from a full page URL
    ///
    /// # Errors
    /// Returns [`RegionError::InvalidUrl`] if the URL cannot be parsed.
    pub fn from_url(raw: &str) -> Result<Self, RegionError> {
        let url = Url::parse(raw).map_err(|e| RegionError::invalid_url(raw, e.to_string()))?;

        Ok(Self {
            hostname: normalize_host(url.host_str().unwrap_or_default()),
            query: url.query_pairs().into_owned().collect(),
            dev_build: false,
        })
    }

    /// With query parameter appended
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// With build-time development flag
    #[inline]
    #[must_use]
    pub fn with_dev_build(mut self, dev_build: bool) -> Self {
        self.dev_build = dev_build;
        self
    }

    /// Normalized hostname
    #[inline]
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// First value of a query parameter
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Upper-cased `region` parameter, if non-empty
    #[must_use]
    pub fn region_param(&self) -> Option<String> {
        self.query("region")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_ascii_uppercase)
    }

    /// Build-time development flag
    #[inline]
    #[must_use]
    pub fn dev_build(&self) -> bool {
        self.dev_build
    }

    /// Dev mode: development build or `?dev=true`
    #[must_use]
    pub fn is_dev_mode(&self) -> bool {
        self.dev_build || self.query("dev") == Some("true")
    }
}

fn normalize_host(raw: &str) -> String {
    let host = raw.trim();
    let host = if host.starts_with('[') {
        host.split_inclusive(']').next().unwrap_or(host)
    } else {
        host.split(':').next().unwrap_or(host)
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_is_normalized() {
        let env = Environment::new("WWW.HealingBuds.co.za:8080");
        assert_eq!(env.hostname(), "www.healingbuds.co.za");
    }

    #[test]
    fn trailing_dot_is_dropped() {
        assert_eq!(Environment::new("healingbuds.pt.").hostname(), "healingbuds.pt");
    }

    #[test]
    fn from_url_reads_host_and_query() {
        let env = Environment::from_url("https://healingbuds.co.uk/shop?region=pt&dev=true").unwrap();
        assert_eq!(env.hostname(), "healingbuds.co.uk");
        assert_eq!(env.query("region"), Some("pt"));
        assert_eq!(env.region_param().as_deref(), Some("PT"));
        assert!(env.is_dev_mode());
    }

    #[test]
    fn from_url_rejects_garbage() {
        assert!(matches!(
            Environment::from_url("not a url"),
            Err(RegionError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn first_query_value_wins() {
        let env = Environment::new("healingbuds.com")
            .with_query("region", "GB")
            .with_query("region", "PT");
        assert_eq!(env.region_param().as_deref(), Some("GB"));
    }

    #[test]
    fn empty_region_param_is_absent() {
        let env = Environment::new("healingbuds.com").with_query("region", "  ");
        assert_eq!(env.region_param(), None);
    }

    #[test]
    fn dev_mode_sources() {
        assert!(!Environment::new("healingbuds.com").is_dev_mode());
        assert!(Environment::new("healingbuds.com").with_dev_build(true).is_dev_mode());
        assert!(!Environment::new("healingbuds.com")
            .with_query("dev", "1")
            .is_dev_mode());
    }
}
