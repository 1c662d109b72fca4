//! In-process block store.
//!
//! Mirrors the relational store's semantics (unique user id, row-not-found on
//! delete) without a database. Availability can be switched off to exercise
//! store failure paths.

use crate::error::StoreError;
use crate::store::{BlockEntry, BlockStore};
use async_trait::async_trait;
use infamous_common::UserId;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mutex-guarded map implementing [`BlockStore`].
#[derive(Debug)]
pub struct MemoryBlockStore {
    rows: Mutex<BTreeMap<UserId, String>>,
    available: AtomicBool,
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryBlockStore {
    /// Creates an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = BlockEntry>) -> Self {
        let store = Self::new();
        store.rows.lock().extend(
            entries
                .into_iter()
                .map(|entry| (entry.user_id, entry.reason)),
        );
        store
    }

    /// Makes every subsequent call succeed (`true`) or fail as unavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Reads a stored reason directly, bypassing availability.
    pub fn stored_reason(&self, user_id: UserId) -> Option<String> {
        self.rows.lock().get(&user_id).cloned()
    }

    /// Number of stored rows, bypassing availability.
    pub fn row_count(&self) -> usize {
        self.rows.lock().len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn insert(&self, user_id: UserId, reason: &str) -> Result<(), StoreError> {
        self.check_available()?;

        let mut rows = self.rows.lock();
        if rows.contains_key(&user_id) {
            return Err(StoreError::DuplicateKey(user_id));
        }
        rows.insert(user_id, reason.to_string());
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.rows.lock().remove(&user_id).is_some())
    }

    async fn scan(&self) -> Result<Vec<BlockEntry>, StoreError> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .iter()
            .map(|(user_id, reason)| BlockEntry::new(*user_id, reason.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_enforces_uniqueness() {
        let store = MemoryBlockStore::new();
        store.insert(UserId(1), "first").await.unwrap();

        let err = store.insert(UserId(1), "second").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(UserId(1))));
        assert_eq!(store.stored_reason(UserId(1)).as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_delete_signals_missing_row() {
        let store = MemoryBlockStore::with_entries([BlockEntry::new(UserId(2), "x")]);

        assert!(store.delete(UserId(2)).await.unwrap());
        assert!(!store.delete(UserId(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_everything() {
        let store = MemoryBlockStore::new();
        store.set_available(false);

        assert!(matches!(
            store.insert(UserId(3), "x").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.delete(UserId(3)).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(store.scan().await, Err(StoreError::Unavailable(_))));
        assert_eq!(store.row_count(), 0);
    }
}
