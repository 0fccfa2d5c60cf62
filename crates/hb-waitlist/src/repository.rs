//! Waitlist persistence abstraction
//!
//! Rows are unique per `(email, country_code)`; a second insert for the same
//! pair fails with [`RepositoryError::Duplicate`].

use crate::error::{RepoResult, RepositoryError};
use crate::types::WaitlistEntry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hb_region::CountryCode;
use std::sync::Arc;

/// Waitlist repository
#[async_trait]
pub trait WaitlistRepository: Send + Sync {
    /// Insert a new signup
    async fn insert(&self, entry: WaitlistEntry) -> RepoResult<()>;

    /// Record that the welcome email was sent
    async fn mark_email_sent(
        &self,
        email: &str,
        country: &CountryCode,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// All signups, oldest first
    async fn list(&self) -> RepoResult<Vec<WaitlistEntry>>;
}

#[async_trait]
impl<T: WaitlistRepository + ?Sized> WaitlistRepository for Arc<T> {
    async fn insert(&self, entry: WaitlistEntry) -> RepoResult<()> {
        (**self).insert(entry).await
    }

    async fn mark_email_sent(
        &self,
        email: &str,
        country: &CountryCode,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        (**self).mark_email_sent(email, country, at).await
    }

    async fn list(&self) -> RepoResult<Vec<WaitlistEntry>> {
        (**self).list().await
    }
}

/// In-memory waitlist repository (for testing and development)
#[derive(Debug, Default)]
pub struct InMemoryWaitlistRepository {
    entries: DashMap<(String, CountryCode), WaitlistEntry>,
}

impl InMemoryWaitlistRepository {
    /// Create empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of signups
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no one signed up yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a single signup
    #[must_use]
    pub fn get(&self, email: &str, country: &CountryCode) -> Option<WaitlistEntry> {
        self.entries
            .get(&(email.to_string(), country.clone()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl WaitlistRepository for InMemoryWaitlistRepository {
    async fn insert(&self, entry: WaitlistEntry) -> RepoResult<()> {
        let key = (entry.email.clone(), entry.country_code.clone());
        match self.entries.entry(key) {
            Entry::Occupied(existing) => Err(RepositoryError::duplicate(
                existing.key().0.clone(),
                existing.key().1.clone(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    async fn mark_email_sent(
        &self,
        email: &str,
        country: &CountryCode,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut entry = self
            .entries
            .get_mut(&(email.to_string(), country.clone()))
            .ok_or_else(|| RepositoryError::NotFound(format!("{email} ({country})")))?;
        entry.email_sent_at = Some(at);
        Ok(())
    }

    async fn list(&self) -> RepoResult<Vec<WaitlistEntry>> {
        let mut entries: Vec<_> = self.entries.iter().map(|e| e.value().clone()).collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientContext, SignupRequest, WaitlistSource};

    fn entry(email: &str, country: CountryCode) -> WaitlistEntry {
        let request = SignupRequest::new(email, country, "Somewhere", WaitlistSource::FooterCta);
        WaitlistEntry::new(email.to_string(), &request, &ClientContext::default())
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryWaitlistRepository::new();
        repo.insert(entry("a@b.com", CountryCode::PT)).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert!(repo.get("a@b.com", &CountryCode::PT).is_some());
        assert!(repo.get("a@b.com", &CountryCode::GB).is_none());
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected() {
        let repo = InMemoryWaitlistRepository::new();
        repo.insert(entry("a@b.com", CountryCode::PT)).await.unwrap();

        let err = repo.insert(entry("a@b.com", CountryCode::PT)).await.unwrap_err();
        assert!(err.is_duplicate());

        // Same email in another country is a separate signup
        repo.insert(entry("a@b.com", CountryCode::GB)).await.unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn mark_email_sent_updates_row() {
        let repo = InMemoryWaitlistRepository::new();
        repo.insert(entry("a@b.com", CountryCode::PT)).await.unwrap();

        let now = Utc::now();
        repo.mark_email_sent("a@b.com", &CountryCode::PT, now).await.unwrap();

        let stored = repo.get("a@b.com", &CountryCode::PT).unwrap();
        assert_eq!(stored.email_sent_at, Some(now));
    }

    #[tokio::test]
    async fn mark_email_sent_missing_row() {
        let repo = InMemoryWaitlistRepository::new();
        let result = repo.mark_email_sent("x@y.com", &CountryCode::GB, Utc::now()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
