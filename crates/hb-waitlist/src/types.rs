//! Waitlist data types

use chrono::{DateTime, Utc};
use hb_region::CountryCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the signup originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistSource {
    /// Full-screen pre-launch gate
    PrelaunchGate,
    /// Footer call-to-action
    FooterCta,
    /// Global country selector
    CountrySelector,
}

/// Signup request from a client surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Email as entered
    pub email: String,
    /// Region the visitor signed up from
    pub country_code: CountryCode,
    /// Display name of that region
    pub country_name: String,
    /// Surface the signup came from
    pub source: WaitlistSource,
}

impl SignupRequest {
    /// Create new request
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        country_code: CountryCode,
        country_name: impl Into<String>,
        source: WaitlistSource,
    ) -> Self {
        Self {
            email: email.into(),
            country_code,
            country_name: country_name.into(),
            source,
        }
    }
}

/// Request metadata recorded alongside the signup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    /// Browser user agent
    pub user_agent: Option<String>,
    /// Referring page
    pub referrer: Option<String>,
}

impl ClientContext {
    /// With user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// With referrer; empty referrers are not recorded
    #[must_use]
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        let referrer = referrer.into();
        self.referrer = (!referrer.is_empty()).then_some(referrer);
        self
    }
}

/// Stored waitlist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Row id
    pub id: Uuid,
    /// Trimmed, lower-cased email
    pub email: String,
    /// Region the visitor signed up from
    pub country_code: CountryCode,
    /// Display name of that region
    pub country_name: String,
    /// Surface the signup came from
    pub source: WaitlistSource,
    /// Browser user agent
    pub user_agent: Option<String>,
    /// Referring page
    pub referrer: Option<String>,
    /// Signup time
    pub created_at: DateTime<Utc>,
    /// Set once the welcome email went out
    pub email_sent_at: Option<DateTime<Utc>>,
}

impl WaitlistEntry {
    /// Build row for a normalized email
    #[must_use]
    pub fn new(email: String, request: &SignupRequest, context: &ClientContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            country_code: request.country_code.clone(),
            country_name: request.country_name.clone(),
            source: request.source,
            user_agent: context.user_agent.clone(),
            referrer: context.referrer.clone(),
            created_at: Utc::now(),
            email_sent_at: None,
        }
    }
}

/// Result reported back to the client surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupOutcome {
    /// Visitor is on the list
    pub success: bool,
    /// User-facing failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Email was already listed
    pub already_signed_up: bool,
}

impl SignupOutcome {
    /// Fresh signup
    #[must_use]
    pub fn joined() -> Self {
        Self {
            success: true,
            error: None,
            already_signed_up: false,
        }
    }

    /// Email was already on the list
    #[must_use]
    pub fn already_signed_up() -> Self {
        Self {
            success: true,
            error: None,
            already_signed_up: true,
        }
    }

    /// Failed with a user-facing message
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            already_signed_up: false,
        }
    }
}

/// Welcome email payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeEmail {
    /// Email as entered
    pub email: String,
    /// Local part of the email, used as greeting name
    pub name: String,
    /// Region the welcome copy is written for
    pub region: CountryCode,
    /// Display name of that region
    pub country_name: String,
}

impl WelcomeEmail {
    /// Build payload for a normalized email
    #[must_use]
    pub fn new(email: &str, region: &CountryCode, country_name: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            email: email.to_string(),
            name,
            region: region.clone(),
            country_name: country_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_wire_names() {
        let json = serde_json::to_string(&WaitlistSource::PrelaunchGate).unwrap();
        assert_eq!(json, "\"prelaunch_gate\"");
        let back: WaitlistSource = serde_json::from_str("\"footer_cta\"").unwrap();
        assert_eq!(back, WaitlistSource::FooterCta);
    }

    #[test]
    fn welcome_email_uses_local_part() {
        let email = WelcomeEmail::new("jane.doe@example.com", &CountryCode::GB, "United Kingdom");
        assert_eq!(email.name, "jane.doe");
        assert_eq!(email.region, CountryCode::GB);
    }

    #[test]
    fn empty_referrer_is_dropped() {
        let context = ClientContext::default().with_referrer("");
        assert_eq!(context.referrer, None);
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let json = serde_json::to_value(SignupOutcome::already_signed_up()).unwrap();
        assert_eq!(json["alreadySignedUp"], true);
        assert!(json.get("error").is_none());
    }
}
