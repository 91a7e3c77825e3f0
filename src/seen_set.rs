// SPDX-License-Identifier: MPL-2.0
//! Persisted set of notification ids the user has already been shown.
//!
//! Membership only grows: the engine never removes an id, not even once the
//! notification's own expiry has passed.
//!
//! # Failure policy
//!
//! - Unreadable or corrupt data reads as "not seen" (fail open), so a broken
//!   store shows a notification again rather than hiding it forever.
//! - `add` skips the write when the backend cannot be read, so ids already
//!   persisted are never overwritten. Only a corrupt blob is replaced.
//! - Write failures are logged and swallowed.
//!
//! # Known limitation
//!
//! `add` is a read-modify-write of the whole blob and is not atomic across
//! stores sharing one backend. Two ids added at the same moment may lose
//! one update; the lost notification is then shown once more.

use crate::config::DEFAULT_SEEN_SET_KEY;
use crate::error::StorageError;
use crate::notification::NotificationId;
use crate::storage::KeyValueStorage;

/// Seen-tracking as consumed by the presentation engine.
pub trait SeenSet: Send + Sync {
    fn has(&self, id: &NotificationId) -> bool;
    fn add(&self, id: &NotificationId);
}

/// [`SeenSet`] persisted as a JSON array of ids under a single storage key.
#[derive(Debug)]
pub struct SeenSetStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> SeenSetStore<S> {
    /// Creates a store using the default key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_SEEN_SET_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the persisted ids in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend fails, or
    /// [`StorageError::Corrupt`] if the blob is not a list of ids.
    pub fn load(&self) -> Result<Vec<NotificationId>, StorageError> {
        match self.storage.get(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt(err.to_string()))
            }
        }
    }

    /// Persisted ids, or an empty list if they cannot be read.
    #[must_use]
    pub fn ids(&self) -> Vec<NotificationId> {
        self.load().unwrap_or_else(|err| {
            tracing::warn!(key = %self.key, error = %err, "seen-set unreadable, treating as empty");
            Vec::new()
        })
    }

    fn store(&self, ids: &[NotificationId]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(ids).map_err(|err| StorageError::Write(err.to_string()))?;
        self.storage.set(&self.key, &raw)
    }
}

impl<S: KeyValueStorage> SeenSet for SeenSetStore<S> {
    fn has(&self, id: &NotificationId) -> bool {
        self.ids().contains(id)
    }

    fn add(&self, id: &NotificationId) {
        let mut ids = match self.load() {
            Ok(ids) => ids,
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(key = %self.key, %reason, "replacing corrupt seen-set");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    %id,
                    key = %self.key,
                    error = %err,
                    "seen-set unreadable, not marking notification as seen"
                );
                return;
            }
        };
        if ids.contains(id) {
            return;
        }
        ids.push(id.clone());

        match self.store(&ids) {
            Ok(()) => tracing::debug!(%id, key = %self.key, "marked notification as seen"),
            Err(err) => {
                tracing::warn!(%id, key = %self.key, error = %err, "failed to persist seen notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::FailingStorage;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Memory storage whose next read fails once armed.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_next_read: AtomicBool,
        writes: AtomicUsize,
    }

    impl FlakyStorage {
        fn fail_next_read(&self) {
            self.fail_next_read.store(true, Ordering::SeqCst);
        }
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_next_read.swap(false, Ordering::SeqCst) {
                return Err(StorageError::Read("device busy".to_string()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }
    }

    fn id(raw: &str) -> NotificationId {
        NotificationId::new(raw)
    }

    #[test]
    fn empty_store_has_nothing() {
        let store = SeenSetStore::new(MemoryStorage::new());
        assert!(!store.has(&id("n1")));
        assert!(store.ids().is_empty());
    }

    #[test]
    fn add_then_has() {
        let store = SeenSetStore::new(MemoryStorage::new());
        store.add(&id("n1"));
        assert!(store.has(&id("n1")));
        assert!(!store.has(&id("n2")));
    }

    #[test]
    fn add_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SeenSetStore::new(Arc::clone(&storage));

        store.add(&id("n1"));
        let after_first = storage.get(DEFAULT_SEEN_SET_KEY).unwrap();
        store.add(&id("n1"));
        let after_second = storage.get(DEFAULT_SEEN_SET_KEY).unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(store.ids(), vec![id("n1")]);
    }

    #[test]
    fn ids_keep_insertion_order() {
        let store = SeenSetStore::new(MemoryStorage::new());
        for raw in ["c", "a", "b"] {
            store.add(&id(raw));
        }
        assert_eq!(store.ids(), vec![id("c"), id("a"), id("b")]);
    }

    #[test]
    fn blob_is_a_json_array() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SeenSetStore::with_key(Arc::clone(&storage), "seen");
        store.add(&id("n1"));
        store.add(&id("n2"));

        assert_eq!(
            storage.get("seen").unwrap().as_deref(),
            Some(r#"["n1","n2"]"#)
        );
    }

    #[test]
    fn corrupt_blob_fails_open() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(DEFAULT_SEEN_SET_KEY, "{not json").unwrap();
        let store = SeenSetStore::new(Arc::clone(&storage));

        assert!(!store.has(&id("n1")));
        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn add_over_corrupt_blob_starts_fresh() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(DEFAULT_SEEN_SET_KEY, "42").unwrap();
        let store = SeenSetStore::new(Arc::clone(&storage));

        store.add(&id("n1"));
        assert_eq!(store.ids(), vec![id("n1")]);
    }

    #[test]
    fn add_over_failed_read_keeps_existing_ids() {
        let storage = Arc::new(FlakyStorage::default());
        let store = SeenSetStore::new(Arc::clone(&storage));
        store.add(&id("old1"));
        store.add(&id("old2"));
        let writes_before = storage.writes.load(Ordering::SeqCst);

        storage.fail_next_read();
        store.add(&id("new"));

        assert_eq!(storage.writes.load(Ordering::SeqCst), writes_before);
        assert_eq!(store.ids(), vec![id("old1"), id("old2")]);

        store.add(&id("new"));
        assert_eq!(store.ids(), vec![id("old1"), id("old2"), id("new")]);
    }

    #[test]
    fn add_over_unreadable_storage_does_not_write() {
        let storage = Arc::new(FailingStorage::unreadable());
        let store = SeenSetStore::new(Arc::clone(&storage));
        store.add(&id("n1"));
        assert_eq!(storage.write_attempts(), 0);
    }

    #[test]
    fn unreadable_storage_fails_open() {
        let store = SeenSetStore::new(FailingStorage::unreadable());
        assert!(!store.has(&id("n1")));
    }

    #[test]
    fn write_failure_is_swallowed() {
        let store = SeenSetStore::new(FailingStorage::unwritable());
        store.add(&id("n1"));
        assert!(!store.has(&id("n1")));
    }

    #[test]
    fn separate_keys_are_independent() {
        let storage = Arc::new(MemoryStorage::new());
        let first = SeenSetStore::with_key(Arc::clone(&storage), "a");
        let second = SeenSetStore::with_key(Arc::clone(&storage), "b");

        first.add(&id("n1"));
        assert!(first.has(&id("n1")));
        assert!(!second.has(&id("n1")));
    }
}
