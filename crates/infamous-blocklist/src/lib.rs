//! # Infamous Block List
//!
//! Access control for command dispatch: a durable table of blocked users
//! mirrored by an in-memory cache.
//!
//! [`BlockAuthority`] is the only type callers mutate through. It writes to a
//! [`BlockStore`] first and updates its [`BlockCache`] only once the store has
//! confirmed, so the cache never claims a state the store does not hold.
//! [`BlockAuthority::is_blocked`] answers from the cache alone and never waits
//! on the store.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod authority;
pub mod cache;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use authority::{BlockAuthority, BlockListSnapshot};
pub use cache::BlockCache;
pub use error::{BlockError, StoreError};
pub use memory::MemoryBlockStore;
pub use postgres::PgBlockStore;
pub use store::{BlockEntry, BlockStore};
