//! Country codes and region classification
//!
//! [`CountryCode`] is the only stored piece of region state; a
//! [`RegionType`] is always derived from it through the config's sets.

use crate::error::RegionError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Upper-case country code (`ZA`, `GB`, ...) or the `GLOBAL` sentinel
///
/// Parsing trims whitespace and upper-cases ASCII letters. A valid code is
/// 2 to 8 ASCII letters; codes outside the configured markets are still
/// valid and classify as [`RegionType::Global`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(Cow<'static, str>);

impl CountryCode {
    /// South Africa
    pub const ZA: Self = Self(Cow::Borrowed("ZA"));
    /// Thailand
    pub const TH: Self = Self(Cow::Borrowed("TH"));
    /// United Kingdom
    pub const GB: Self = Self(Cow::Borrowed("GB"));
    /// Portugal
    pub const PT: Self = Self(Cow::Borrowed("PT"));
    /// Global sentinel (country-selection splash)
    pub const GLOBAL: Self = Self(Cow::Borrowed("GLOBAL"));

    const MIN_LEN: usize = 2;
    const MAX_LEN: usize = 8;

    /// Parse and normalize a raw code
    ///
    /// # Errors
    /// Returns [`RegionError::InvalidCountryCode`] if the trimmed value is not
    /// 2 to 8 ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, RegionError> {
        let trimmed = raw.trim();
        let valid = (Self::MIN_LEN..=Self::MAX_LEN).contains(&trimmed.len())
            && trimmed.bytes().all(|b| b.is_ascii_alphabetic());

        if !valid {
            return Err(RegionError::InvalidCountryCode(raw.to_string()));
        }

        Ok(Self(Cow::Owned(trimmed.to_ascii_uppercase())))
    }

    /// Code as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the global sentinel
    #[inline]
    #[must_use]
    pub fn is_global_sentinel(&self) -> bool {
        *self == Self::GLOBAL
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0.into_owned()
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Region classification of a country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    /// Live market: storefront shown
    Operational,
    /// Not yet open: waitlist gate shown
    Prelaunch,
    /// Anything else: country-selection splash shown
    Global,
}

impl RegionType {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Prelaunch => "prelaunch",
            Self::Global => "global",
        }
    }
}

impl Display for RegionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let code = CountryCode::parse("  gb ").unwrap();
        assert_eq!(code, CountryCode::GB);
        assert_eq!(code.as_str(), "GB");
    }

    #[test]
    fn parse_accepts_global_sentinel() {
        let code: CountryCode = "global".parse().unwrap();
        assert!(code.is_global_sentinel());
    }

    #[test]
    fn parse_accepts_unknown_markets() {
        let code = CountryCode::parse("FR").unwrap();
        assert_eq!(code.to_string(), "FR");
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!(CountryCode::parse("").is_err());
        assert!(CountryCode::parse("Z").is_err());
        assert!(CountryCode::parse("Z4").is_err());
        assert!(CountryCode::parse("co.za").is_err());
        assert!(CountryCode::parse("TOOLONGCODE").is_err());
    }

    #[test]
    fn constants_equal_parsed_values() {
        assert_eq!(CountryCode::parse("za").unwrap(), CountryCode::ZA);
        assert_eq!(CountryCode::parse("th").unwrap(), CountryCode::TH);
        assert_eq!(CountryCode::parse("pt").unwrap(), CountryCode::PT);
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&CountryCode::PT).unwrap();
        assert_eq!(json, "\"PT\"");

        let back: CountryCode = serde_json::from_str("\"th\"").unwrap();
        assert_eq!(back, CountryCode::TH);

        assert!(serde_json::from_str::<CountryCode>("\"1\"").is_err());
    }

    #[test]
    fn region_type_wire_names() {
        assert_eq!(RegionType::Prelaunch.to_string(), "prelaunch");
        let json = serde_json::to_string(&RegionType::Operational).unwrap();
        assert_eq!(json, "\"operational\"");
    }
}
