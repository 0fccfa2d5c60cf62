//! Developer-only region override
//!
//! A [`DevTools`] handle can only be obtained from
//! [`RegionGate::dev_tools`], which refuses outside dev mode. Production
//! visitors therefore have no path to the override operations.

use crate::country::{CountryCode, RegionType};
use crate::error::RegionError;
use crate::gate::RegionGate;
use crate::storage::KeyValueStore;
use serde::Serialize;

/// Entry in the developer region picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    /// Country code
    pub code: CountryCode,
    /// Display name
    pub name: String,
    /// Classification
    pub region_type: RegionType,
}

/// Mutable access to the override operations of a gate
#[derive(Debug)]
pub struct DevTools<'a, D, S> {
    gate: &'a mut RegionGate<D, S>,
}

impl<'a, D: KeyValueStore, S: KeyValueStore> DevTools<'a, D, S> {
    pub(crate) fn new(gate: &'a mut RegionGate<D, S>) -> Self {
        Self { gate }
    }

    /// Force a region, or clear the override with `None`
    ///
    /// `Some(code)` persists the override to the session scope and resolves
    /// straight from it. `None` removes it and re-runs full resolution.
    ///
    /// # Errors
    /// Returns [`RegionError::InvalidCountryCode`] if `code` does not parse;
    /// the gate is left unchanged.
    pub fn set_override_country(&mut self, code: Option<&str>) -> Result<(), RegionError> {
        match code {
            Some(raw) => {
                let code = CountryCode::parse(raw)?;
                tracing::info!("Region override set to {code}");
                self.gate.apply_override(code);
            }
            None => {
                tracing::info!("Region override cleared");
                self.gate.clear_override();
            }
        }
        Ok(())
    }

    /// Clear the override and the joined/dismissed flags
    pub fn reset_override(&mut self) {
        self.gate.clear_override();
        self.gate.clear_gate_flags();
        tracing::info!("Region state reset to first visit");
    }

    /// Selectable regions: operational, pre-launch, then global
    #[must_use]
    pub fn regions(&self) -> Vec<RegionOption> {
        let config = self.gate.config();

        config
            .operational
            .iter()
            .chain(&config.prelaunch)
            .chain(std::iter::once(&CountryCode::GLOBAL))
            .map(|code| RegionOption {
                code: code.clone(),
                name: config.country_name(code).to_string(),
                region_type: config.region_type(code),
            })
            .collect()
    }

    /// Currently active country
    #[must_use]
    pub fn active(&self) -> &CountryCode {
        self.gate.country_code()
    }

    /// Whether an override is in effect
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.gate.override_country().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegionConfig;
    use crate::environment::Environment;
    use crate::resolver::ResolutionSource;
    use crate::storage::{keys, InMemoryStore};

    fn dev_gate(host: &str) -> RegionGate<InMemoryStore, InMemoryStore> {
        RegionGate::load(
            RegionConfig::default(),
            Environment::new(host).with_dev_build(true),
            InMemoryStore::new(),
            InMemoryStore::new(),
        )
        .unwrap()
    }

    #[test]
    fn override_applies_immediately() {
        let mut gate = dev_gate("healingbuds.pt");
        gate.dev_tools().unwrap().set_override_country(Some("th")).unwrap();

        assert_eq!(gate.country_code(), &CountryCode::TH);
        assert_eq!(gate.region_type(), RegionType::Operational);
        assert_eq!(gate.region().source, ResolutionSource::SessionOverride);
        assert_eq!(gate.session().get(keys::REGION_OVERRIDE).as_deref(), Some("TH"));
    }

    #[test]
    fn override_bypasses_query_param_until_reload() {
        let env = Environment::new("healingbuds.co.za")
            .with_dev_build(true)
            .with_query("region", "GB");
        let mut gate = RegionGate::load(
            RegionConfig::default(),
            env,
            InMemoryStore::new(),
            InMemoryStore::new(),
        )
        .unwrap();
        assert_eq!(gate.country_code(), &CountryCode::GB);

        gate.dev_tools().unwrap().set_override_country(Some("TH")).unwrap();
        assert_eq!(gate.country_code(), &CountryCode::TH);

        gate.refresh();
        assert_eq!(gate.country_code(), &CountryCode::GB);
    }

    #[test]
    fn clearing_override_re_resolves() {
        let mut gate = dev_gate("healingbuds.pt");
        let mut tools = gate.dev_tools().unwrap();
        tools.set_override_country(Some("ZA")).unwrap();
        tools.set_override_country(None).unwrap();
        assert!(!tools.is_overridden());

        assert_eq!(gate.country_code(), &CountryCode::PT);
        assert!(gate.session().is_empty());
    }

    #[test]
    fn invalid_override_leaves_gate_unchanged() {
        let mut gate = dev_gate("healingbuds.pt");
        let result = gate.dev_tools().unwrap().set_override_country(Some("1"));

        assert!(matches!(result, Err(RegionError::InvalidCountryCode(_))));
        assert_eq!(gate.country_code(), &CountryCode::PT);
        assert_eq!(gate.override_country(), None);
    }

    #[test]
    fn reset_restores_first_visit() {
        let mut gate = dev_gate("healingbuds.pt");
        gate.mark_waitlist_joined("a@b.com");
        gate.dev_tools().unwrap().set_override_country(Some("GB")).unwrap();

        gate.dev_tools().unwrap().reset_override();

        assert_eq!(gate.country_code(), &CountryCode::PT);
        assert!(!gate.has_joined_waitlist());
        assert!(!gate.has_dismissed_gate());
        assert!(!gate.durable().flag(keys::WAITLIST_JOINED));
        // Last join details are kept
        assert_eq!(gate.durable().get(keys::WAITLIST_EMAIL).as_deref(), Some("a@b.com"));
    }

    #[test]
    fn regions_list_every_market_and_global() {
        let mut gate = dev_gate("healingbuds.co.za");
        let tools = gate.dev_tools().unwrap();
        let codes: Vec<_> = tools.regions().into_iter().map(|r| r.code).collect();

        assert_eq!(
            codes,
            vec![
                CountryCode::ZA,
                CountryCode::TH,
                CountryCode::GB,
                CountryCode::PT,
                CountryCode::GLOBAL
            ]
        );
        assert_eq!(tools.active(), &CountryCode::ZA);
    }

    #[test]
    fn query_dev_flag_enables_tools() {
        let mut gate = RegionGate::load(
            RegionConfig::default(),
            Environment::new("healingbuds.co.za").with_query("dev", "true"),
            InMemoryStore::new(),
            InMemoryStore::new(),
        )
        .unwrap();
        assert!(gate.dev_tools().is_ok());
    }
}
