//! In-memory mirror of the block store.

use crate::store::BlockEntry;
use infamous_common::UserId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Fast-path membership and reason lookup.
///
/// Holds no authority of its own: it is filled from a store scan at startup
/// and mutated only by [`BlockAuthority`](crate::BlockAuthority) after the
/// store confirms a write.
#[derive(Debug, Default)]
pub struct BlockCache {
    entries: RwLock<HashMap<UserId, String>>,
}

impl BlockCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cache from scanned entries.
    pub fn from_entries(entries: impl IntoIterator<Item = BlockEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.user_id, entry.reason))
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Whether `user_id` is cached as blocked.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.entries.read().contains_key(&user_id)
    }

    /// Cached reason for `user_id`, if blocked.
    pub fn get_reason(&self, user_id: UserId) -> Option<String> {
        self.entries.read().get(&user_id).cloned()
    }

    /// Records `user_id` as blocked.
    pub fn put(&self, user_id: UserId, reason: impl Into<String>) {
        self.entries.write().insert(user_id, reason.into());
    }

    /// Forgets `user_id`, returning the reason it was cached with.
    pub fn remove(&self, user_id: UserId) -> Option<String> {
        self.entries.write().remove(&user_id)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copies all entries, ordered by user id.
    pub fn snapshot(&self) -> Vec<BlockEntry> {
        let mut entries: Vec<BlockEntry> = self
            .entries
            .read()
            .iter()
            .map(|(user_id, reason)| BlockEntry::new(*user_id, reason.clone()))
            .collect();
        entries.sort_by_key(|entry| entry.user_id);
        entries
    }
}
