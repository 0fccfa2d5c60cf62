//! Region gate service
//!
//! Holds the resolved region plus the persisted gate flags, and exposes the
//! predicates the application shell uses to pick between the storefront,
//! the pre-launch gate and the country selector.
//!
//! # State Machine
//!
//! ```text
//! operational            → Storefront
//! prelaunch, not joined  → Gate { joined: false }
//! prelaunch, joined      → Gate { joined: true }   (stealth)
//!                        → Storefront              (dismissible)
//! global                 → CountrySelector
//! ```
//!
//! Transitions only happen on load/refresh, waitlist join, dismiss (where the
//! policy permits it) and developer override/reset.

use crate::config::{GatePolicy, RegionConfig};
use crate::country::{CountryCode, RegionType};
use crate::dev_tools::DevTools;
use crate::environment::Environment;
use crate::error::{RegionError, RegionResult};
use crate::resolver::{resolve, ResolutionSource, ResolvedRegion};
use crate::storage::{keys, KeyValueStore};
use serde::Serialize;
use std::sync::Arc;

/// What the application shell should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GateView {
    /// Normal routed storefront
    Storefront,
    /// Full-screen pre-launch gate; `joined` selects form vs confirmation
    Gate {
        /// Visitor already joined the waitlist
        joined: bool,
    },
    /// Country-selection splash
    CountrySelector,
}

/// Serializable snapshot of the gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct RegionGateStatus {
    /// Resolved country
    pub country_code: CountryCode,
    /// Display name
    pub country_name: String,
    /// Derived classification
    pub region_type: RegionType,
    /// Rule that decided the country
    pub source: ResolutionSource,
    /// Live market
    pub is_operational: bool,
    /// Behind the waitlist gate
    pub is_pre_launch: bool,
    /// Neither live nor pre-launch
    pub is_global: bool,
    /// Visitor joined the waitlist
    pub has_joined_waitlist: bool,
    /// Visitor dismissed the gate
    pub has_dismissed_gate: bool,
    /// Gate covers the storefront
    pub should_show_gate: bool,
    /// Country selector replaces the home page
    pub should_show_country_selector: bool,
    /// Active developer override
    pub override_country: Option<CountryCode>,
    /// Dev mode enabled
    pub is_dev_mode: bool,
    /// Configured gate policy
    pub gate_policy: GatePolicy,
    /// What to render
    pub view: GateView,
}

/// Region gate over a durable store `D` and a session store `S`
#[derive(Debug)]
pub struct RegionGate<D, S> {
    config: Arc<RegionConfig>,
    env: Environment,
    durable: D,
    session: S,
    region: ResolvedRegion,
    has_joined_waitlist: bool,
    has_dismissed_gate: bool,
    override_country: Option<CountryCode>,
}

impl<D: KeyValueStore, S: KeyValueStore> RegionGate<D, S> {
    /// Load gate state and resolve the region
    ///
    /// # Errors
    /// Returns [`RegionError::Config`] if the rules fail
    /// [`RegionConfig::validate`].
    pub fn load(
        config: impl Into<Arc<RegionConfig>>,
        env: Environment,
        durable: D,
        session: S,
    ) -> RegionResult<Self> {
        let config = config.into();
        config.validate()?;

        let override_country = read_override(&session);
        let region = resolve(&config, &env, override_country.as_ref().map(CountryCode::as_str));
        let has_joined_waitlist = durable.flag(keys::WAITLIST_JOINED);
        let has_dismissed_gate = durable.flag(keys::GATE_DISMISSED);

        tracing::debug!(
            "Resolved {} ({}) via {:?}",
            region.country,
            region.region_type,
            region.source
        );

        Ok(Self {
            config,
            env,
            durable,
            session,
            region,
            has_joined_waitlist,
            has_dismissed_gate,
            override_country,
        })
    }

    /// Re-run resolution from current inputs
    pub fn refresh(&mut self) {
        self.override_country = read_override(&self.session);
        self.region = resolve(
            &self.config,
            &self.env,
            self.override_country.as_ref().map(CountryCode::as_str),
        );
        tracing::debug!(
            "Re-resolved {} ({}) via {:?}",
            self.region.country,
            self.region.region_type,
            self.region.source
        );
    }

    /// Replace the browsing context and re-resolve
    pub fn navigate(&mut self, env: Environment) {
        self.env = env;
        self.refresh();
    }

    /// Record a successful waitlist signup
    ///
    /// Idempotent; a repeat call only overwrites the stored email/country.
    pub fn mark_waitlist_joined(&mut self, email: &str) {
        self.durable.set_flag(keys::WAITLIST_JOINED);
        self.durable
            .set(keys::WAITLIST_COUNTRY, self.region.country.as_str());
        self.durable.set(keys::WAITLIST_EMAIL, email);
        self.has_joined_waitlist = true;
        tracing::info!("Waitlist joined from {}", self.region.country);
    }

    /// Dismiss the gate
    ///
    /// No-op under [`GatePolicy::Stealth`].
    pub fn dismiss_gate(&mut self) {
        match self.config.gate_policy {
            GatePolicy::Dismissible => {
                self.durable.set_flag(keys::GATE_DISMISSED);
                self.has_dismissed_gate = true;
                tracing::info!("Gate dismissed for {}", self.region.country);
            }
            GatePolicy::Stealth => {
                tracing::info!("Dismiss attempted but blocked by stealth policy");
            }
        }
    }

    /// Developer tools handle
    ///
    /// # Errors
    /// Returns [`RegionError::DevToolsDisabled`] unless the environment is in
    /// dev mode.
    pub fn dev_tools(&mut self) -> Result<DevTools<'_, D, S>, RegionError> {
        if !self.env.is_dev_mode() {
            tracing::warn!("Developer tools requested outside dev mode");
            return Err(RegionError::DevToolsDisabled);
        }
        Ok(DevTools::new(self))
    }

    /// Write the override and resolve directly from it
    pub(crate) fn apply_override(&mut self, code: CountryCode) {
        self.session.set(keys::REGION_OVERRIDE, code.as_str());
        self.region = ResolvedRegion::classify(
            &self.config,
            code.clone(),
            ResolutionSource::SessionOverride,
        );
        self.override_country = Some(code);
    }

    /// Remove the override and re-run full resolution
    pub(crate) fn clear_override(&mut self) {
        self.session.remove(keys::REGION_OVERRIDE);
        self.refresh();
    }

    /// Forget joined/dismissed flags
    pub(crate) fn clear_gate_flags(&mut self) {
        self.durable.remove(keys::WAITLIST_JOINED);
        self.durable.remove(keys::GATE_DISMISSED);
        self.has_joined_waitlist = false;
        self.has_dismissed_gate = false;
    }

    /// Region rules
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Current browsing context
    #[inline]
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Durable store
    #[inline]
    #[must_use]
    pub fn durable(&self) -> &D {
        &self.durable
    }

    /// Session store
    #[inline]
    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Resolved region
    #[inline]
    #[must_use]
    pub fn region(&self) -> &ResolvedRegion {
        &self.region
    }

    /// Resolved country code
    #[inline]
    #[must_use]
    pub fn country_code(&self) -> &CountryCode {
        &self.region.country
    }

    /// Display name of the resolved country
    #[inline]
    #[must_use]
    pub fn country_name(&self) -> &str {
        self.config.country_name(&self.region.country)
    }

    /// Derived region type
    #[inline]
    #[must_use]
    pub fn region_type(&self) -> RegionType {
        self.region.region_type
    }

    /// Country is a live market
    #[inline]
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.region.region_type == RegionType::Operational
    }

    /// Country is behind the waitlist gate
    #[inline]
    #[must_use]
    pub fn is_prelaunch(&self) -> bool {
        self.region.region_type == RegionType::Prelaunch
    }

    /// Country-selection splash applies
    #[inline]
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.region.region_type == RegionType::Global
    }

    /// Visitor joined the waitlist
    #[inline]
    #[must_use]
    pub fn has_joined_waitlist(&self) -> bool {
        self.has_joined_waitlist
    }

    /// Visitor dismissed the gate
    #[inline]
    #[must_use]
    pub fn has_dismissed_gate(&self) -> bool {
        self.has_dismissed_gate
    }

    /// Active developer override
    #[inline]
    #[must_use]
    pub fn override_country(&self) -> Option<&CountryCode> {
        self.override_country.as_ref()
    }

    /// Dev mode enabled for this context
    #[inline]
    #[must_use]
    pub fn is_dev_mode(&self) -> bool {
        self.env.is_dev_mode()
    }

    /// Whether the pre-launch gate covers the storefront
    #[must_use]
    pub fn should_show_gate(&self) -> bool {
        match self.config.gate_policy {
            GatePolicy::Stealth => self.is_prelaunch(),
            GatePolicy::Dismissible => {
                self.is_prelaunch() && !self.has_joined_waitlist && !self.has_dismissed_gate
            }
        }
    }

    /// Whether the country selector replaces the home page
    #[inline]
    #[must_use]
    pub fn should_show_country_selector(&self) -> bool {
        self.is_global()
    }

    /// Current view
    #[must_use]
    pub fn view(&self) -> GateView {
        if self.should_show_country_selector() {
            GateView::CountrySelector
        } else if self.should_show_gate() {
            GateView::Gate {
                joined: self.has_joined_waitlist,
            }
        } else {
            GateView::Storefront
        }
    }

    /// Snapshot of every field and predicate
    #[must_use]
    pub fn status(&self) -> RegionGateStatus {
        RegionGateStatus {
            country_code: self.region.country.clone(),
            country_name: self.country_name().to_string(),
            region_type: self.region.region_type,
            source: self.region.source,
            is_operational: self.is_operational(),
            is_pre_launch: self.is_prelaunch(),
            is_global: self.is_global(),
            has_joined_waitlist: self.has_joined_waitlist,
            has_dismissed_gate: self.has_dismissed_gate,
            should_show_gate: self.should_show_gate(),
            should_show_country_selector: self.should_show_country_selector(),
            override_country: self.override_country.clone(),
            is_dev_mode: self.is_dev_mode(),
            gate_policy: self.config.gate_policy,
            view: self.view(),
        }
    }
}

fn read_override(session: &impl KeyValueStore) -> Option<CountryCode> {
    let raw = session.get(keys::REGION_OVERRIDE)?;
    match CountryCode::parse(&raw) {
        Ok(code) => Some(code),
        Err(_) => {
            tracing::warn!("Ignoring malformed region override: {raw:?}");
            None
        }
    }
}
