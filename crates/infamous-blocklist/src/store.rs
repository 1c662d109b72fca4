//! Persistence boundary for block entries.

use crate::error::StoreError;
use async_trait::async_trait;
use infamous_common::UserId;
use serde::{Deserialize, Serialize};

/// A single blocked user and the reason given at block time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    /// Platform-issued user identifier.
    pub user_id: UserId,
    /// Free text supplied by the operator.
    pub reason: String,
}

impl BlockEntry {
    /// Creates a new entry.
    pub fn new(user_id: UserId, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
        }
    }
}

/// Durable storage for block entries with a uniqueness constraint on the user.
///
/// Implementations never retry internally; a failed call surfaces as
/// [`StoreError::Unavailable`] straight away.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Adds an entry.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if `user_id` is already stored.
    async fn insert(&self, user_id: UserId, reason: &str) -> Result<(), StoreError>;

    /// Removes the entry for `user_id`.
    ///
    /// Returns `Ok(false)` when no row existed.
    async fn delete(&self, user_id: UserId) -> Result<bool, StoreError>;

    /// Returns every stored entry.
    async fn scan(&self) -> Result<Vec<BlockEntry>, StoreError>;
}
