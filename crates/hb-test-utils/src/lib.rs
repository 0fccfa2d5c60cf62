//! Testing utilities for Healing Buds workspace
//!
//! Shared test helpers, fixtures, and doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use hb_region::{Environment, GatePolicy, InMemoryStore, RegionConfig, RegionGate};
use hb_waitlist::{MailerError, WaitlistMailer, WelcomeEmail};
use parking_lot::Mutex;
use std::sync::Arc;

pub type SharedStore = Arc<InMemoryStore>;
pub type TestGate = RegionGate<SharedStore, SharedStore>;

/// A browser profile: durable storage that survives reloads, and a session
/// store that survives reloads within one tab.
#[derive(Debug, Clone)]
pub struct Browser {
    pub config: Arc<RegionConfig>,
    pub durable: SharedStore,
    pub session: SharedStore,
}

impl Browser {
    pub fn new(config: RegionConfig) -> Self {
        Self {
            config: Arc::new(config),
            durable: Arc::new(InMemoryStore::new()),
            session: Arc::new(InMemoryStore::new()),
        }
    }

    pub fn stealth() -> Self {
        Self::new(RegionConfig::default().with_gate_policy(GatePolicy::Stealth))
    }

    pub fn dismissible() -> Self {
        Self::new(RegionConfig::default().with_gate_policy(GatePolicy::Dismissible))
    }

    /// Load a page
    pub fn open(&self, env: Environment) -> TestGate {
        RegionGate::load(
            Arc::clone(&self.config),
            env,
            Arc::clone(&self.durable),
            Arc::clone(&self.session),
        )
        .expect("fixture config is valid")
    }

    pub fn open_host(&self, host: &str) -> TestGate {
        self.open(Environment::new(host))
    }

    pub fn open_dev(&self, host: &str) -> TestGate {
        self.open(Environment::new(host).with_dev_build(true))
    }

    /// Close the tab and open a new one
    pub fn new_session(&mut self) {
        self.session = Arc::new(InMemoryStore::new());
    }
}

/// Mailer double that records every welcome email
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<WelcomeEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<WelcomeEmail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl WaitlistMailer for RecordingMailer {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError> {
        self.sent.lock().push(email.clone());
        Ok(())
    }
}

/// Mailer double that always fails
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingMailer;

#[async_trait]
impl WaitlistMailer for FailingMailer {
    async fn send_welcome(&self, _email: &WelcomeEmail) -> Result<(), MailerError> {
        Err(MailerError::Transport("connection refused".to_string()))
    }
}
