//! Waitlist signup flow
//!
//! # Workflow
//! 1. Normalize the email (trim, lower-case)
//! 2. Insert the row; a duplicate counts as success
//! 3. Send the welcome email; failure never fails the signup
//! 4. Stamp `email_sent_at`, best effort

use crate::error::RepositoryError;
use crate::mailer::WaitlistMailer;
use crate::repository::WaitlistRepository;
use crate::types::{ClientContext, SignupOutcome, SignupRequest, WaitlistEntry, WelcomeEmail};
use chrono::Utc;

/// Shown when the repository rejects the insert
pub const INSERT_FAILED_MESSAGE: &str = "Failed to join waitlist. Please try again.";

/// Shown for any other failure
pub const UNEXPECTED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Trim and lower-case an email
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Waitlist signup service
#[derive(Debug)]
pub struct WaitlistSignup<R, M> {
    repository: R,
    mailer: M,
}

impl<R: WaitlistRepository, M: WaitlistMailer> WaitlistSignup<R, M> {
    /// Create service over a repository and mailer
    #[must_use]
    pub fn new(repository: R, mailer: M) -> Self {
        Self { repository, mailer }
    }

    /// Backing repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Record a signup
    ///
    /// Never returns an error: failures are reported through
    /// [`SignupOutcome::error`] with a user-facing message.
    pub async fn signup(&self, request: SignupRequest, context: &ClientContext) -> SignupOutcome {
        let email = normalize_email(&request.email);
        let entry = WaitlistEntry::new(email.clone(), &request, context);

        match self.repository.insert(entry).await {
            Ok(()) => {}
            Err(RepositoryError::Duplicate { .. }) => {
                tracing::info!("Email already on waitlist for {}", request.country_code);
                return SignupOutcome::already_signed_up();
            }
            Err(err @ RepositoryError::Unavailable(_)) => {
                tracing::error!("Waitlist storage unavailable: {}", err);
                return SignupOutcome::failed(UNEXPECTED_MESSAGE);
            }
            Err(err) => {
                tracing::error!("Waitlist insert error: {}", err);
                return SignupOutcome::failed(INSERT_FAILED_MESSAGE);
            }
        }

        tracing::info!(
            "Waitlist signup for {} via {:?}",
            request.country_code,
            request.source
        );

        let welcome = WelcomeEmail::new(&email, &request.country_code, &request.country_name);
        match self.mailer.send_welcome(&welcome).await {
            Ok(()) => {
                tracing::debug!("Welcome email sent");
                if let Err(err) = self
                    .repository
                    .mark_email_sent(&email, &request.country_code, Utc::now())
                    .await
                {
                    tracing::warn!("Could not record email_sent_at: {}", err);
                }
            }
            Err(err) => tracing::error!("Welcome email failed: {}", err),
        }

        SignupOutcome::joined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MailerError, RepoResult};
    use crate::mailer::LogMailer;
    use crate::repository::InMemoryWaitlistRepository;
    use crate::types::WaitlistSource;
    use async_trait::async_trait;
    use chrono::DateTime;
    use hb_region::CountryCode;

    struct BrokenRepository(RepositoryError);

    #[async_trait]
    impl WaitlistRepository for BrokenRepository {
        async fn insert(&self, _entry: WaitlistEntry) -> RepoResult<()> {
            Err(self.0.clone())
        }

        async fn mark_email_sent(
            &self,
            _email: &str,
            _country: &CountryCode,
            _at: DateTime<Utc>,
        ) -> RepoResult<()> {
            unreachable!("insert always fails")
        }

        async fn list(&self) -> RepoResult<Vec<WaitlistEntry>> {
            Ok(Vec::new())
        }
    }

    struct BouncingMailer;

    #[async_trait]
    impl WaitlistMailer for BouncingMailer {
        async fn send_welcome(&self, _email: &WelcomeEmail) -> Result<(), MailerError> {
            Err(MailerError::Rejected("bounced".into()))
        }
    }

    fn request(email: &str) -> SignupRequest {
        SignupRequest::new(email, CountryCode::PT, "Portugal", WaitlistSource::PrelaunchGate)
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[tokio::test]
    async fn signup_stores_normalized_row() {
        let service = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);
        let context = ClientContext::default().with_user_agent("test-agent");

        let outcome = service.signup(request(" Jane@Example.com "), &context).await;
        assert_eq!(outcome, SignupOutcome::joined());

        let stored = service
            .repository()
            .get("jane@example.com", &CountryCode::PT)
            .unwrap();
        assert_eq!(stored.user_agent.as_deref(), Some("test-agent"));
        assert!(stored.email_sent_at.is_some());
    }

    #[tokio::test]
    async fn duplicate_is_success() {
        let service = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);
        let context = ClientContext::default();

        service.signup(request("a@b.com"), &context).await;
        let outcome = service.signup(request("A@B.com"), &context).await;

        assert!(outcome.success);
        assert!(outcome.already_signed_up);
        assert_eq!(service.repository().len(), 1);
    }

    #[tokio::test]
    async fn storage_error_maps_to_insert_message() {
        let service = WaitlistSignup::new(
            BrokenRepository(RepositoryError::Storage("constraint".into())),
            LogMailer,
        );
        let outcome = service.signup(request("a@b.com"), &ClientContext::default()).await;

        assert_eq!(outcome, SignupOutcome::failed(INSERT_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn unavailable_maps_to_unexpected_message() {
        let service = WaitlistSignup::new(
            BrokenRepository(RepositoryError::Unavailable("timeout".into())),
            LogMailer,
        );
        let outcome = service.signup(request("a@b.com"), &ClientContext::default()).await;

        assert_eq!(outcome.error.as_deref(), Some(UNEXPECTED_MESSAGE));
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_signup() {
        let service = WaitlistSignup::new(InMemoryWaitlistRepository::new(), BouncingMailer);
        let outcome = service.signup(request("a@b.com"), &ClientContext::default()).await;

        assert!(outcome.success);
        let stored = service.repository().get("a@b.com", &CountryCode::PT).unwrap();
        assert_eq!(stored.email_sent_at, None);
    }
}
