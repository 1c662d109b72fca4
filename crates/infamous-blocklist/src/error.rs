//! Error types for the block list.

use infamous_common::UserId;
use thiserror::Error;

/// Failures reported by a [`BlockStore`](crate::BlockStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store already holds an entry for this user.
    #[error("a block entry for user {0} already exists")]
    DuplicateKey(UserId),

    /// The store could not be reached or rejected the statement.
    #[error("block store unavailable: {0}")]
    Unavailable(String),
}

/// Outcomes of block list operations that callers report to operators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Attempted to block a user who is already blocked.
    #[error("user {0} is already blocked")]
    AlreadyBlocked(UserId),

    /// Attempted to unblock a user who was never blocked.
    #[error("user {0} was never blocked")]
    NotBlocked(UserId),

    /// The durable store is unreachable; nothing was changed.
    #[error("block list storage is unavailable: {0}")]
    StoreUnavailable(String),
}

impl BlockError {
    /// Whether the failure came from the store rather than the request.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
