//! The block list's single point of mutation.

use crate::cache::BlockCache;
use crate::error::{BlockError, StoreError};
use crate::store::{BlockEntry, BlockStore};
use infamous_common::UserId;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Keeps a [`BlockStore`] and its [`BlockCache`] consistent.
///
/// Constructed once at startup from a full store scan and shared as
/// `Arc<BlockAuthority>` with every dispatch path.
pub struct BlockAuthority {
    store: Arc<dyn BlockStore>,
    cache: BlockCache,
    // Held across the store round trip and the cache update that follows it.
    write_lock: Mutex<()>,
}

impl fmt::Debug for BlockAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockAuthority")
            .field("store", &"<dyn BlockStore>")
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}

impl BlockAuthority {
    /// Scans `store` and builds the cache from its contents.
    pub async fn load(store: Arc<dyn BlockStore>) -> Result<Self, BlockError> {
        let entries = store.scan().await.map_err(|e| {
            error!("Failed to load block list: {}", e);
            store_unavailable(e)
        })?;

        info!("Loaded {} blocked users", entries.len());

        Ok(Self {
            store,
            cache: BlockCache::from_entries(entries),
            write_lock: Mutex::new(()),
        })
    }

    /// Blocks `user_id`.
    ///
    /// The store is written first; the cache changes only after it confirms.
    /// A user who is already stored yields [`BlockError::AlreadyBlocked`] and
    /// keeps the original reason.
    pub async fn block(&self, user_id: UserId, reason: &str) -> Result<(), BlockError> {
        let _guard = self.write_lock.lock().await;

        match self.store.insert(user_id, reason).await {
            Ok(()) => {
                self.cache.put(user_id, reason);
                info!(user_id = %user_id, reason, "User blocked");
                Ok(())
            }
            Err(StoreError::DuplicateKey(_)) => {
                warn!(user_id = %user_id, "Block rejected: user already blocked");
                Err(BlockError::AlreadyBlocked(user_id))
            }
            Err(e) => {
                error!(user_id = %user_id, "Block failed: {}", e);
                Err(store_unavailable(e))
            }
        }
    }

    /// Unblocks `user_id`.
    ///
    /// Returns [`BlockError::NotBlocked`] when the store had no row for it.
    pub async fn unblock(&self, user_id: UserId) -> Result<(), BlockError> {
        let _guard = self.write_lock.lock().await;

        match self.store.delete(user_id).await {
            Ok(true) => {
                self.cache.remove(user_id);
                info!(user_id = %user_id, "User unblocked");
                Ok(())
            }
            Ok(false) => {
                warn!(user_id = %user_id, "Unblock rejected: user was never blocked");
                Err(BlockError::NotBlocked(user_id))
            }
            Err(e) => {
                error!(user_id = %user_id, "Unblock failed: {}", e);
                Err(store_unavailable(e))
            }
        }
    }

    /// Whether `user_id` is blocked. Answers from the cache only.
    pub fn is_blocked(&self, user_id: UserId) -> bool {
        self.cache.contains(user_id)
    }

    /// The reason `user_id` was blocked with, if blocked.
    pub fn reason(&self, user_id: UserId) -> Option<String> {
        self.cache.get_reason(user_id)
    }

    /// Number of blocked users.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nobody is blocked.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Snapshot of every blocked user, ordered by id.
    ///
    /// Each entry existed at some point during the call; later mutations are
    /// not reflected.
    pub fn list_blocked(&self) -> BlockListSnapshot {
        BlockListSnapshot {
            entries: self.cache.snapshot(),
        }
    }
}

fn store_unavailable(err: StoreError) -> BlockError {
    match err {
        StoreError::Unavailable(message) => BlockError::StoreUnavailable(message),
        other => BlockError::StoreUnavailable(other.to_string()),
    }
}

/// Point-in-time copy of the block list.
///
/// Finite and restartable: iterate it by reference as many times as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockListSnapshot {
    entries: Vec<BlockEntry>,
}

impl BlockListSnapshot {
    /// Iterates the entries in user id order.
    pub fn iter(&self) -> std::slice::Iter<'_, BlockEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the snapshot lists `user_id`.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.entries
            .binary_search_by_key(&user_id, |entry| entry.user_id)
            .is_ok()
    }
}

impl<'a> IntoIterator for &'a BlockListSnapshot {
    type Item = &'a BlockEntry;
    type IntoIter = std::slice::Iter<'a, BlockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for BlockListSnapshot {
    type Item = BlockEntry;
    type IntoIter = std::vec::IntoIter<BlockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockBlockStore;

    fn mock_with_scan(entries: Vec<BlockEntry>) -> MockBlockStore {
        let mut store = MockBlockStore::new();
        store
            .expect_scan()
            .times(1)
            .return_once(move || Ok(entries));
        store
    }

    #[tokio::test]
    async fn test_load_populates_cache_from_scan() {
        let store = mock_with_scan(vec![
            BlockEntry::new(UserId(5), "alt account"),
            BlockEntry::new(UserId(6), "exploit"),
        ]);

        let authority = BlockAuthority::load(Arc::new(store)).await.unwrap();
        assert!(authority.is_blocked(UserId(5)));
        assert_eq!(authority.reason(UserId(6)).as_deref(), Some("exploit"));
        assert_eq!(authority.len(), 2);
    }

    #[tokio::test]
    async fn test_load_reports_unavailable_store() {
        let mut store = MockBlockStore::new();
        store
            .expect_scan()
            .return_once(|| Err(StoreError::Unavailable("connection refused".into())));

        let err = BlockAuthority::load(Arc::new(store)).await.unwrap_err();
        assert_eq!(
            err,
            BlockError::StoreUnavailable("connection refused".into())
        );
    }

    #[tokio::test]
    async fn test_block_failure_leaves_cache_clean() {
        let mut store = mock_with_scan(Vec::new());
        store
            .expect_insert()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("timeout".into())));

        let authority = BlockAuthority::load(Arc::new(store)).await.unwrap();
        let err = authority.block(UserId(42), "spam").await.unwrap_err();

        assert!(err.is_store_failure());
        assert!(!authority.is_blocked(UserId(42)));
    }

    #[tokio::test]
    async fn test_unblock_failure_keeps_cache_entry() {
        let mut store = mock_with_scan(vec![BlockEntry::new(UserId(42), "spam")]);
        store
            .expect_delete()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("timeout".into())));

        let authority = BlockAuthority::load(Arc::new(store)).await.unwrap();
        let err = authority.unblock(UserId(42)).await.unwrap_err();

        assert!(err.is_store_failure());
        assert!(authority.is_blocked(UserId(42)));
    }

    #[tokio::test]
    async fn test_duplicate_key_maps_to_already_blocked() {
        let mut store = mock_with_scan(Vec::new());
        store
            .expect_insert()
            .returning(|user_id, _| Err(StoreError::DuplicateKey(user_id)));

        let authority = BlockAuthority::load(Arc::new(store)).await.unwrap();
        let err = authority.block(UserId(9), "again").await.unwrap_err();

        assert_eq!(err, BlockError::AlreadyBlocked(UserId(9)));
        // The store held the row, not the cache; the cache is not touched.
        assert!(!authority.is_blocked(UserId(9)));
    }

    #[tokio::test]
    async fn test_missing_row_maps_to_not_blocked() {
        let mut store = mock_with_scan(Vec::new());
        store.expect_delete().returning(|_| Ok(false));

        let authority = BlockAuthority::load(Arc::new(store)).await.unwrap();
        assert_eq!(
            authority.unblock(UserId(3)).await.unwrap_err(),
            BlockError::NotBlocked(UserId(3))
        );
    }

    #[tokio::test]
    async fn test_is_blocked_never_touches_store() {
        // No insert/delete/scan expectations beyond the initial load.
        let store = mock_with_scan(vec![BlockEntry::new(UserId(1), "x")]);
        let authority = BlockAuthority::load(Arc::new(store)).await.unwrap();

        for _ in 0..100 {
            assert!(authority.is_blocked(UserId(1)));
            assert!(!authority.is_blocked(UserId(2)));
        }
    }

    #[test]
    fn test_snapshot_is_restartable() {
        let snapshot = BlockListSnapshot {
            entries: vec![BlockEntry::new(UserId(1), "a"), BlockEntry::new(UserId(2), "b")],
        };

        let first: Vec<_> = snapshot.iter().map(|e| e.user_id).collect();
        let second: Vec<_> = (&snapshot).into_iter().map(|e| e.user_id).collect();
        assert_eq!(first, second);
        assert!(snapshot.contains(UserId(2)));
        assert!(!snapshot.contains(UserId(3)));
    }
}
