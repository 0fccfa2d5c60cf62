//! Pre-launch gate form submission
//!
//! Validates the email locally, hands the signup to [`WaitlistSignup`], and
//! only marks the gate joined once the signup reports success.

use crate::mailer::WaitlistMailer;
use crate::repository::WaitlistRepository;
use crate::signup::{WaitlistSignup, UNEXPECTED_MESSAGE};
use crate::types::{ClientContext, SignupRequest, WaitlistSource};
use hb_region::{CountryCode, KeyValueStore, RegionGate};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Result of a gate form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateSubmission {
    /// Signup succeeded and the gate was informed
    Joined {
        /// Email was already on the waitlist
        already_signed_up: bool,
    },
    /// Signup did not go through; `message` is shown verbatim
    Rejected {
        /// User-facing message
        message: String,
    },
}

/// Loose `local@domain.tld` shape check
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Localized invalid-email message for a country
#[must_use]
pub fn invalid_email_message(country: &CountryCode) -> &'static str {
    if *country == CountryCode::PT {
        "Por favor, introduza um endereço de email válido"
    } else {
        "Please enter a valid email address"
    }
}

/// Submit the gate's waitlist form
///
/// Invalid emails are rejected without reaching the repository. On success
/// the gate records the join; on failure the collaborator's message is
/// returned unchanged.
pub async fn submit_gate_form<D, S, R, M>(
    gate: &mut RegionGate<D, S>,
    signup: &WaitlistSignup<R, M>,
    email: &str,
    context: &ClientContext,
) -> GateSubmission
where
    D: KeyValueStore,
    S: KeyValueStore,
    R: WaitlistRepository,
    M: WaitlistMailer,
{
    let email = email.trim();
    let country = gate.country_code().clone();

    if !is_valid_email(email) {
        tracing::debug!("Rejected malformed email on {} gate", country);
        return GateSubmission::Rejected {
            message: invalid_email_message(&country).to_string(),
        };
    }

    let request = SignupRequest::new(
        email,
        country,
        gate.country_name(),
        WaitlistSource::PrelaunchGate,
    );
    let outcome = signup.signup(request, context).await;

    if outcome.success {
        gate.mark_waitlist_joined(email);
        GateSubmission::Joined {
            already_signed_up: outcome.already_signed_up,
        }
    } else {
        GateSubmission::Rejected {
            message: outcome
                .error
                .unwrap_or_else(|| UNEXPECTED_MESSAGE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RepoResult, RepositoryError};
    use crate::mailer::LogMailer;
    use crate::repository::InMemoryWaitlistRepository;
    use crate::types::WaitlistEntry;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use hb_region::{keys, Environment, GateView, InMemoryStore, RegionConfig};

    struct DownRepository;

    #[async_trait]
    impl WaitlistRepository for DownRepository {
        async fn insert(&self, _entry: WaitlistEntry) -> RepoResult<()> {
            Err(RepositoryError::Storage("disk full".to_string()))
        }

        async fn mark_email_sent(
            &self,
            _email: &str,
            _country: &CountryCode,
            _at: DateTime<Utc>,
        ) -> RepoResult<()> {
            Ok(())
        }

        async fn list(&self) -> RepoResult<Vec<WaitlistEntry>> {
            Ok(Vec::new())
        }
    }

    fn gate(host: &str) -> RegionGate<InMemoryStore, InMemoryStore> {
        RegionGate::load(
            RegionConfig::default(),
            Environment::new(host),
            InMemoryStore::new(),
            InMemoryStore::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_submission_joins_gate() {
        let mut gate = gate("healingbuds.pt");
        let signup = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);

        let result =
            submit_gate_form(&mut gate, &signup, "Ana@Example.pt", &ClientContext::default())
                .await;

        assert_eq!(
            result,
            GateSubmission::Joined {
                already_signed_up: false
            }
        );
        assert!(gate.has_joined_waitlist());
        assert_eq!(gate.view(), GateView::Gate { joined: true });
        assert_eq!(gate.durable().get(keys::WAITLIST_COUNTRY).as_deref(), Some("PT"));

        let stored = signup
            .repository()
            .get("ana@example.pt", &CountryCode::PT)
            .unwrap();
        assert_eq!(stored.country_name, "Portugal");
        assert_eq!(stored.source, WaitlistSource::PrelaunchGate);
    }

    #[tokio::test]
    async fn repeat_submission_still_joins() {
        let mut gate = gate("healingbuds.co.uk");
        let signup = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);
        let context = ClientContext::default();

        submit_gate_form(&mut gate, &signup, "a@b.com", &context).await;
        let second = submit_gate_form(&mut gate, &signup, "a@b.com", &context).await;

        assert_eq!(
            second,
            GateSubmission::Joined {
                already_signed_up: true
            }
        );
        assert_eq!(signup.repository().len(), 1);
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_repository() {
        let mut gate = gate("healingbuds.pt");
        let signup = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);

        let result =
            submit_gate_form(&mut gate, &signup, "not-an-email", &ClientContext::default()).await;

        assert_eq!(
            result,
            GateSubmission::Rejected {
                message: invalid_email_message(&CountryCode::PT).to_string()
            }
        );
        assert!(signup.repository().is_empty());
        assert!(!gate.has_joined_waitlist());
    }

    #[tokio::test]
    async fn failed_signup_leaves_gate_untouched() {
        let mut gate = gate("healingbuds.co.uk");
        let signup = WaitlistSignup::new(DownRepository, LogMailer);

        let result = submit_gate_form(&mut gate, &signup, "a@b.com", &ClientContext::default())
            .await;

        assert_eq!(
            result,
            GateSubmission::Rejected {
                message: crate::signup::INSERT_FAILED_MESSAGE.to_string()
            }
        );
        assert!(!gate.has_joined_waitlist());
        assert_eq!(gate.durable().get(keys::WAITLIST_JOINED), None);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane.doe+tag@example.co.uk"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(!is_valid_email(" a@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn invalid_message_is_localized() {
        assert!(invalid_email_message(&CountryCode::PT).starts_with("Por favor"));
        assert_eq!(
            invalid_email_message(&CountryCode::GB),
            "Please enter a valid email address"
        );
    }
}
