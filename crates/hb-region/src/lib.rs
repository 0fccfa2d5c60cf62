//! Healing Buds Region Gate
//!
//! Classifies a visitor into a country and region type and exposes the
//! gating decisions that depend on that classification.
//!
//! # Resolution Order
//!
//! 1. `?region=<CODE>` naming a known operational, pre-launch or global code
//! 2. Session-scoped override written by the developer tools
//! 3. Staging/preview hostnames (default operational country)
//! 4. Country domain suffixes (`.co.za`, `.pt`, ...)
//! 5. Global domains (country-selection splash)
//! 6. Default operational country
//!
//! # Architecture
//!
//! ```text
//! Environment ──┐
//!               ├─→ resolve() ─→ ResolvedRegion ─→ RegionGate ─→ GateView
//! session  ─────┘                                   ↑      ↓
//!                                      durable store ←── mark_waitlist_joined / dismiss_gate
//! ```
//!
//! # Example
//!
//! ```
//! use hb_region::{Environment, InMemoryStore, RegionConfig, RegionGate, RegionType};
//!
//! let env = Environment::new("healingbuds.pt");
//! let gate = RegionGate::load(RegionConfig::default(), env, InMemoryStore::new(), InMemoryStore::new())?;
//!
//! assert_eq!(gate.region_type(), RegionType::Prelaunch);
//! assert!(gate.should_show_gate());
//! # Ok::<(), hb_region::RegionError>(())
//! ```

// Core modules
pub mod config;
pub mod country;
pub mod dev_tools;
pub mod environment;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod storage;

// Re-exports for convenience
pub use config::{DomainRule, GatePolicy, RegionConfig};
pub use country::{CountryCode, RegionType};
pub use dev_tools::{DevTools, RegionOption};
pub use environment::Environment;
pub use error::{ConfigError, RegionError, RegionResult};
pub use gate::{GateView, RegionGate, RegionGateStatus};
pub use resolver::{resolve, ResolutionSource, ResolvedRegion};
pub use storage::{keys, InMemoryStore, KeyValueStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the region gate
    pub use crate::{
        CountryCode, Environment, GatePolicy, GateView, InMemoryStore, KeyValueStore,
        RegionConfig, RegionGate, RegionType,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
