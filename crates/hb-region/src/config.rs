//! Region rules table
//!
//! Defines which countries are live, which are pre-launch, and how
//! hostnames map to countries. Loadable from TOML with every field optional.

use crate::country::{CountryCode, RegionType};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Gate behaviour for pre-launch visitors
///
/// The two policies are mutually exclusive and never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
    /// Gate always shows for pre-launch countries and cannot be dismissed
    #[default]
    Stealth,
    /// Gate hides once the visitor joins the waitlist or dismisses it
    Dismissible,
}

impl std::str::FromStr for GatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stealth" => Ok(Self::Stealth),
            "dismissible" => Ok(Self::Dismissible),
            other => Err(ConfigError::Parse(format!("unknown gate policy: '{other}'"))),
        }
    }
}

/// Hostname suffix mapped to a country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    /// Suffix including leading dot, e.g. `.co.za`
    pub suffix: String,
    /// Country the suffix resolves to
    pub country: CountryCode,
}

impl DomainRule {
    /// Create new rule
    #[must_use]
    pub fn new(suffix: impl Into<String>, country: CountryCode) -> Self {
        Self {
            suffix: suffix.into(),
            country,
        }
    }

    /// Whether the (lower-case) host ends with the suffix or carries it
    /// as an inner label sequence (`shop.co.za.example`)
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        let suffix = self.suffix.to_ascii_lowercase();
        host.ends_with(&suffix) || host.contains(&format!("{suffix}."))
    }
}

/// Region configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Live markets
    pub operational: Vec<CountryCode>,
    /// Markets behind the waitlist gate
    pub prelaunch: Vec<CountryCode>,
    /// Fallback when nothing else matches
    pub default_country: CountryCode,
    /// Staging/preview host substrings resolving to the default country
    pub staging_host_patterns: Vec<String>,
    /// Country domain suffixes, checked in order
    pub domain_suffixes: Vec<DomainRule>,
    /// Exact global hostnames
    pub global_hosts: Vec<String>,
    /// Global hostname suffixes
    pub global_suffixes: Vec<String>,
    /// Display names by code
    pub country_names: BTreeMap<CountryCode, String>,
    /// Pre-launch gate behaviour
    pub gate_policy: GatePolicy,
}

impl RegionConfig {
    const FALLBACK_NAME: &'static str = "Global";

    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With gate policy
    #[inline]
    #[must_use]
    pub fn with_gate_policy(mut self, policy: GatePolicy) -> Self {
        self.gate_policy = policy;
        self
    }

    /// With operational markets
    #[inline]
    #[must_use]
    pub fn with_operational(mut self, codes: Vec<CountryCode>) -> Self {
        self.operational = codes;
        self
    }

    /// With pre-launch markets
    #[inline]
    #[must_use]
    pub fn with_prelaunch(mut self, codes: Vec<CountryCode>) -> Self {
        self.prelaunch = codes;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML, or any validation
    /// error from [`RegionConfig::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`RegionConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Check structural invariants
    ///
    /// # Errors
    /// - [`ConfigError::OverlappingRegions`] if a code is both operational and pre-launch
    /// - [`ConfigError::ReservedCode`] if `GLOBAL` is listed as a market
    /// - [`ConfigError::DefaultNotOperational`] if the default is not live
    /// - [`ConfigError::InvalidSuffix`] / [`ConfigError::EmptyPattern`] for bad host rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(code) = self.operational.iter().find(|c| self.prelaunch.contains(c)) {
            return Err(ConfigError::OverlappingRegions(code.to_string()));
        }

        if let Some(code) = self
            .operational
            .iter()
            .chain(&self.prelaunch)
            .find(|c| c.is_global_sentinel())
        {
            return Err(ConfigError::ReservedCode(code.to_string()));
        }

        if !self.operational.contains(&self.default_country) {
            return Err(ConfigError::DefaultNotOperational(
                self.default_country.to_string(),
            ));
        }

        for rule in &self.domain_suffixes {
            if rule.suffix.len() < 2 || !rule.suffix.starts_with('.') {
                return Err(ConfigError::InvalidSuffix(rule.suffix.clone()));
            }
        }

        for suffix in &self.global_suffixes {
            if suffix.len() < 2 || !suffix.starts_with('.') {
                return Err(ConfigError::InvalidSuffix(suffix.clone()));
            }
        }

        if self.staging_host_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPattern("staging_host_patterns"));
        }

        if self.global_hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::EmptyPattern("global_hosts"));
        }

        Ok(())
    }

    /// Classify a country code
    #[must_use]
    pub fn region_type(&self, code: &CountryCode) -> RegionType {
        if self.is_operational(code) {
            RegionType::Operational
        } else if self.is_prelaunch(code) {
            RegionType::Prelaunch
        } else {
            RegionType::Global
        }
    }

    /// Live market
    #[inline]
    #[must_use]
    pub fn is_operational(&self, code: &CountryCode) -> bool {
        self.operational.contains(code)
    }

    /// Pre-launch market
    #[inline]
    #[must_use]
    pub fn is_prelaunch(&self, code: &CountryCode) -> bool {
        self.prelaunch.contains(code)
    }

    /// Neither operational nor pre-launch
    #[inline]
    #[must_use]
    pub fn is_global(&self, code: &CountryCode) -> bool {
        self.region_type(code) == RegionType::Global
    }

    /// Codes accepted by the `?region=` query parameter
    #[must_use]
    pub fn is_selectable(&self, code: &CountryCode) -> bool {
        self.is_operational(code) || self.is_prelaunch(code) || code.is_global_sentinel()
    }

    /// Display name, `Global` for unknown codes
    #[must_use]
    pub fn country_name(&self, code: &CountryCode) -> &str {
        self.country_names
            .get(code)
            .map_or(Self::FALLBACK_NAME, String::as_str)
    }

    /// Staging/preview host check
    #[must_use]
    pub fn is_staging_host(&self, host: &str) -> bool {
        self.staging_host_patterns
            .iter()
            .any(|p| host.contains(&p.to_ascii_lowercase()))
    }

    /// First matching country suffix rule
    #[must_use]
    pub fn domain_rule_for(&self, host: &str) -> Option<&DomainRule> {
        self.domain_suffixes.iter().find(|rule| rule.matches(host))
    }

    /// Canonical global domain check
    #[must_use]
    pub fn is_global_host(&self, host: &str) -> bool {
        self.global_hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
            || self
                .global_suffixes
                .iter()
                .any(|s| host.ends_with(&s.to_ascii_lowercase()))
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        let country_names = [
            (CountryCode::ZA, "South Africa"),
            (CountryCode::TH, "Thailand"),
            (CountryCode::GB, "United Kingdom"),
            (CountryCode::PT, "Portugal"),
            (CountryCode::GLOBAL, "Global"),
        ]
        .into_iter()
        .map(|(code, name)| (code, name.to_string()))
        .collect();

        Self {
            operational: vec![CountryCode::ZA, CountryCode::TH],
            prelaunch: vec![CountryCode::GB, CountryCode::PT],
            default_country: CountryCode::ZA,
            staging_host_patterns: vec!["lovable.app".to_string(), "lovable.dev".to_string()],
            domain_suffixes: vec![
                DomainRule::new(".pt", CountryCode::PT),
                DomainRule::new(".co.uk", CountryCode::GB),
                DomainRule::new(".co.za", CountryCode::ZA),
                DomainRule::new(".co.th", CountryCode::TH),
            ],
            global_hosts: vec![
                "healingbuds.com".to_string(),
                "www.healingbuds.com".to_string(),
            ],
            global_suffixes: vec![".global".to_string()],
            country_names,
            gate_policy: GatePolicy::default(),
        }
    }
}
