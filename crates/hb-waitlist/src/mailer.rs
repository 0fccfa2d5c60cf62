//! Welcome email delivery seam

use crate::error::MailerError;
use crate::types::WelcomeEmail;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends the waitlist welcome email
#[async_trait]
pub trait WaitlistMailer: Send + Sync {
    /// Deliver the welcome email
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError>;
}

#[async_trait]
impl<T: WaitlistMailer + ?Sized> WaitlistMailer for Arc<T> {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError> {
        (**self).send_welcome(email).await
    }
}

/// Mailer that only logs the send
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl WaitlistMailer for LogMailer {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError> {
        tracing::info!(
            "Welcome email for {} ({}) queued to {}",
            email.country_name,
            email.region,
            email.name
        );
        Ok(())
    }
}
