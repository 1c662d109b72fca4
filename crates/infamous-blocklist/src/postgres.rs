//! PostgreSQL-backed block store.

use crate::error::StoreError;
use crate::store::{BlockEntry, BlockStore};
use async_trait::async_trait;
use infamous_common::UserId;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, error, info};

/// Block store over the `blocked` table.
///
/// Schema: `blocked(id BIGINT PRIMARY KEY, reason TEXT NOT NULL)`.
#[derive(Debug, Clone)]
pub struct PgBlockStore {
    pool: PgPool,
}

impl PgBlockStore {
    /// Wraps an existing pool owned by the host process.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        info!(
            "Connecting to PostgreSQL (max {} connections)",
            max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                StoreError::Unavailable(e.to_string())
            })?;

        Ok(Self { pool })
    }

    /// The underlying pool.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `blocked` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blocked (
                id BIGINT PRIMARY KEY,
                reason TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("create blocked table", &e))?;

        debug!("Block list schema ready");
        Ok(())
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// Snowflakes are stored bit-for-bit in a signed BIGINT; the cast round-trips.
#[allow(clippy::cast_possible_wrap)]
const fn to_column(user_id: UserId) -> i64 {
    user_id.get() as i64
}

#[allow(clippy::cast_sign_loss)]
const fn from_column(id: i64) -> UserId {
    UserId(id as u64)
}

fn unavailable(operation: &str, err: &sqlx::Error) -> StoreError {
    error!("Block store failed to {}: {}", operation, err);
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl BlockStore for PgBlockStore {
    async fn insert(&self, user_id: UserId, reason: &str) -> Result<(), StoreError> {
        let result = sqlx::query("INSERT INTO blocked VALUES($1, $2)")
            .bind(to_column(user_id))
            .bind(reason)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateKey(user_id))
            }
            Err(e) => Err(unavailable("insert block entry", &e)),
        }
    }

    async fn delete(&self, user_id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM blocked WHERE id=$1")
            .bind(to_column(user_id))
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("delete block entry", &e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self) -> Result<Vec<BlockEntry>, StoreError> {
        let rows = sqlx::query("SELECT id, reason FROM blocked ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("scan block entries", &e))?;

        rows.iter()
            .map(|row| {
                let id: i64 = row
                    .try_get("id")
                    .map_err(|e| unavailable("decode block entry id", &e))?;
                let reason: String = row
                    .try_get("reason")
                    .map_err(|e| unavailable("decode block entry reason", &e))?;
                Ok(BlockEntry::new(from_column(id), reason))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_round_trip_preserves_high_bit() {
        for raw in [0, 1, 407_090_515_583_041_537, u64::MAX] {
            assert_eq!(from_column(to_column(UserId(raw))), UserId(raw));
        }
    }
}
