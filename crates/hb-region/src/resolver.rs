//! Priority-ordered region resolution
//!
//! [`resolve`] is a pure function of config, environment and the raw
//! session override. It never fails: unmatched inputs fall through to the
//! next rule and finally to the default country.

use crate::config::RegionConfig;
use crate::country::{CountryCode, RegionType};
use crate::environment::Environment;
use serde::{Deserialize, Serialize};

/// Rule that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// `?region=` query parameter
    QueryParam,
    /// Session-scoped developer override
    SessionOverride,
    /// Staging/preview hostname
    StagingHost,
    /// Country domain suffix
    DomainSuffix,
    /// Canonical global domain
    GlobalHost,
    /// Nothing matched
    Default,
}

/// Country and its derived region type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRegion {
    /// Resolved country
    pub country: CountryCode,
    /// Derived classification
    pub region_type: RegionType,
    /// Winning rule
    pub source: ResolutionSource,
}

impl ResolvedRegion {
    /// Classify a country through the config
    #[must_use]
    pub fn classify(config: &RegionConfig, country: CountryCode, source: ResolutionSource) -> Self {
        Self {
            region_type: config.region_type(&country),
            country,
            source,
        }
    }
}

/// Resolve the visitor's region
///
/// First matching rule wins:
/// 1. `?region=` naming an operational, pre-launch or global code
/// 2. Session override that parses as a country code
/// 3. Staging host → default country
/// 4. Country domain suffix
/// 5. Global host → `GLOBAL`
/// 6. Default country
#[must_use]
pub fn resolve(
    config: &RegionConfig,
    env: &Environment,
    session_override: Option<&str>,
) -> ResolvedRegion {
    let requested = env
        .region_param()
        .and_then(|param| CountryCode::parse(&param).ok())
        .filter(|code| config.is_selectable(code));

    if let Some(code) = requested {
        return ResolvedRegion::classify(config, code, ResolutionSource::QueryParam);
    }

    if let Some(code) = session_override.and_then(|raw| CountryCode::parse(raw).ok()) {
        return ResolvedRegion::classify(config, code, ResolutionSource::SessionOverride);
    }

    let host = env.hostname();

    if config.is_staging_host(host) {
        return ResolvedRegion::classify(
            config,
            config.default_country.clone(),
            ResolutionSource::StagingHost,
        );
    }

    if let Some(rule) = config.domain_rule_for(host) {
        return ResolvedRegion::classify(
            config,
            rule.country.clone(),
            ResolutionSource::DomainSuffix,
        );
    }

    if config.is_global_host(host) {
        return ResolvedRegion::classify(config, CountryCode::GLOBAL, ResolutionSource::GlobalHost);
    }

    ResolvedRegion::classify(
        config,
        config.default_country.clone(),
        ResolutionSource::Default,
    )
}
