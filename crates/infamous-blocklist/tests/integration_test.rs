//! Integration tests for infamous-blocklist crate.
//!
//! These drive a `BlockAuthority` over the in-memory store and check the
//! block/unblock contract end to end, including concurrent callers.

use infamous_blocklist::{BlockAuthority, BlockEntry, BlockError, BlockStore, MemoryBlockStore};
use infamous_common::test_utils::{discord_fixtures, init_test_logging, property_testing};
use infamous_common::UserId;
use proptest::prelude::*;
use std::sync::Arc;

async fn authority_over(store: &Arc<MemoryBlockStore>) -> BlockAuthority {
    let dyn_store: Arc<dyn BlockStore> = store.clone();
    BlockAuthority::load(dyn_store).await.unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_block_unblock_scenario() {
    init_test_logging();
    let store = Arc::new(MemoryBlockStore::new());
    let authority = authority_over(&store).await;

    authority.block(UserId(42), "spam").await.unwrap();
    assert!(authority.is_blocked(UserId(42)));

    let listed = authority.list_blocked();
    assert!(listed
        .iter()
        .any(|entry| *entry == BlockEntry::new(UserId(42), "spam")));

    authority.unblock(UserId(42)).await.unwrap();
    assert!(!authority.is_blocked(UserId(42)));
    assert!(!authority.list_blocked().contains(UserId(42)));

    // A snapshot taken earlier is unaffected by the unblock.
    assert!(listed.contains(UserId(42)));
}

#[tokio::test]
async fn test_load_mirrors_existing_rows() {
    let store = Arc::new(MemoryBlockStore::with_entries([
        BlockEntry::new(UserId(11), "raid"),
        BlockEntry::new(UserId(12), "bug abuse"),
    ]));
    let authority = authority_over(&store).await;

    assert_eq!(authority.len(), 2);
    assert_eq!(authority.reason(UserId(12)).as_deref(), Some("bug abuse"));
}

#[tokio::test]
async fn test_store_failure_during_block_leaves_user_unblocked() {
    let store = Arc::new(MemoryBlockStore::new());
    let authority = authority_over(&store).await;
    let user = discord_fixtures::test_user_id();

    store.set_available(false);
    let err = authority.block(user, "spam").await.unwrap_err();
    assert!(matches!(err, BlockError::StoreUnavailable(_)));
    assert!(!authority.is_blocked(user));

    // Recovery: the same block succeeds once the store is back.
    store.set_available(true);
    authority.block(user, "spam").await.unwrap();
    assert!(authority.is_blocked(user));
}

#[tokio::test]
async fn test_store_failure_during_unblock_keeps_block() {
    let store = Arc::new(MemoryBlockStore::new());
    let authority = authority_over(&store).await;

    authority.block(UserId(5), "x").await.unwrap();
    store.set_available(false);

    assert!(authority.unblock(UserId(5)).await.is_err());
    assert!(authority.is_blocked(UserId(5)));
    assert_eq!(store.stored_reason(UserId(5)).as_deref(), Some("x"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_block_same_user_has_one_winner() {
    let store = Arc::new(MemoryBlockStore::new());
    let authority = Arc::new(authority_over(&store).await);

    for user in discord_fixtures::test_user_ids(25) {
        let first = {
            let authority = authority.clone();
            tokio::spawn(async move { authority.block(user, "first").await })
        };
        let second = {
            let authority = authority.clone();
            tokio::spawn(async move { authority.block(user, "second").await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "exactly one block must succeed for {user}");
        assert!(results
            .iter()
            .any(|r| *r == Err(BlockError::AlreadyBlocked(user))));

        // The cache agrees with whichever write the store accepted.
        let stored = store.stored_reason(user).unwrap();
        assert_eq!(authority.reason(user), Some(stored));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_operations_keep_cache_and_store_equal() {
    let store = Arc::new(MemoryBlockStore::new());
    let authority = Arc::new(authority_over(&store).await);
    let users = discord_fixtures::test_user_ids(10);

    let mut handles = Vec::new();
    for round in 0..4 {
        for user in users.clone() {
            let authority = authority.clone();
            handles.push(tokio::spawn(async move {
                if round % 2 == 0 {
                    let _ = authority.block(user, "round").await;
                } else {
                    let _ = authority.unblock(user).await;
                }
                authority.is_blocked(user)
            }));
        }
    }
    for handle in futures::future::join_all(handles).await {
        handle.unwrap();
    }

    for user in users {
        assert_eq!(
            authority.is_blocked(user),
            store.stored_reason(user).is_some(),
            "cache and store disagree for {user}"
        );
    }
}

proptest! {
    #[test]
    fn prop_block_then_lookup(
        user in property_testing::user_id_strategy(),
        reason in property_testing::reason_strategy(),
    ) {
        runtime().block_on(async {
            let store = Arc::new(MemoryBlockStore::new());
            let authority = authority_over(&store).await;

            authority.block(user, &reason).await.unwrap();
            prop_assert!(authority.is_blocked(user));
            prop_assert_eq!(authority.reason(user), Some(reason.clone()));
            Ok(())
        })?;
    }

    #[test]
    fn prop_unblock_clears(
        user in property_testing::user_id_strategy(),
        reason in property_testing::reason_strategy(),
    ) {
        runtime().block_on(async {
            let store = Arc::new(MemoryBlockStore::new());
            let authority = authority_over(&store).await;

            authority.block(user, &reason).await.unwrap();
            authority.unblock(user).await.unwrap();
            prop_assert!(!authority.is_blocked(user));
            prop_assert_eq!(store.row_count(), 0);
            Ok(())
        })?;
    }

    #[test]
    fn prop_second_block_keeps_first_reason(
        user in property_testing::user_id_strategy(),
        first in property_testing::reason_strategy(),
        second in property_testing::reason_strategy(),
    ) {
        runtime().block_on(async {
            let store = Arc::new(MemoryBlockStore::new());
            let authority = authority_over(&store).await;

            authority.block(user, &first).await.unwrap();
            let err = authority.block(user, &second).await.unwrap_err();
            prop_assert_eq!(err, BlockError::AlreadyBlocked(user));
            prop_assert_eq!(store.stored_reason(user), Some(first.clone()));
            prop_assert_eq!(authority.reason(user), Some(first.clone()));
            Ok(())
        })?;
    }

    #[test]
    fn prop_unblock_absent_is_not_blocked(
        blocked in property_testing::user_id_strategy(),
        other in property_testing::user_id_strategy(),
    ) {
        prop_assume!(blocked != other);
        runtime().block_on(async {
            let store = Arc::new(MemoryBlockStore::with_entries([
                BlockEntry::new(blocked, "kept"),
            ]));
            let authority = authority_over(&store).await;

            let err = authority.unblock(other).await.unwrap_err();
            prop_assert_eq!(err, BlockError::NotBlocked(other));
            prop_assert_eq!(store.row_count(), 1);
            prop_assert!(authority.is_blocked(blocked));
            Ok(())
        })?;
    }
}
