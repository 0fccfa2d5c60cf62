//! Key-value storage scopes
//!
//! The gate persists its flags in two scopes: a durable store that outlives
//! the session and a session-scoped store for the developer override. Both
//! are injected so tests can substitute [`InMemoryStore`].
//!
//! Operations are infallible: a store that cannot be read behaves as empty,
//! which makes every resolution fall back to its coded default.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Storage keys
pub mod keys {
    /// Durable: waitlist joined flag (`"true"`)
    pub const WAITLIST_JOINED: &str = "hb_waitlist_joined";
    /// Durable: gate dismissed flag (`"true"`, dismissible policy only)
    pub const GATE_DISMISSED: &str = "hb_gate_dismissed";
    /// Durable: country the visitor joined from
    pub const WAITLIST_COUNTRY: &str = "hb_waitlist_country";
    /// Durable: email the visitor joined with
    pub const WAITLIST_EMAIL: &str = "hb_waitlist_email";
    /// Session: developer region override
    pub const REGION_OVERRIDE: &str = "hb_region_override";
}

const FLAG_TRUE: &str = "true";

/// Synchronous string key-value store
///
/// Writes are last-write-wins overwrites.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if absent
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str);

    /// Delete a value
    fn remove(&self, key: &str);

    /// Read a boolean flag; anything but `"true"` is false
    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some(FLAG_TRUE)
    }

    /// Set a boolean flag
    fn set_flag(&self, key: &str) {
        self.set(key, FLAG_TRUE);
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// In-memory store (for testing and ephemeral sessions)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create pre-populated store
    #[must_use]
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Ordered copy of all entries
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove everything
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_remove() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));

        store.set("k", "w");
        assert_eq!(store.get("k").as_deref(), Some("w"));
        assert_eq!(store.len(), 1);

        store.remove("k");
        assert!(store.is_empty());
    }

    #[test]
    fn flag_requires_exact_true() {
        let store = InMemoryStore::from_entries([("a", "true"), ("b", "TRUE"), ("c", "1")]);
        assert!(store.flag("a"));
        assert!(!store.flag("b"));
        assert!(!store.flag("c"));
        assert!(!store.flag("missing"));
    }

    #[test]
    fn arc_shares_state() {
        let store = Arc::new(InMemoryStore::new());
        let handle = Arc::clone(&store);

        handle.set_flag(keys::WAITLIST_JOINED);
        assert!(store.flag(keys::WAITLIST_JOINED));
    }

    #[test]
    fn snapshot_is_ordered() {
        let store = InMemoryStore::from_entries([("b", "2"), ("a", "1")]);
        let keys: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
