use std::str::FromStr;

use async_trait::async_trait;
use detour_core::{KeyValueStore, Pairs, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tracing::{debug, trace};

use crate::Result;

const SCHEMA: &str = include_str!("../ddl/sqlite/redirect_buckets.sql");

/// SQLite implementation of the store contract.
///
/// All buckets share the `redirect_buckets` table, partitioned by the
/// `bucket` column. Keys and values are stored as BLOBs.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the database file if it
    /// does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `redirect_buckets` table if it is missing.
    pub async fn create_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Writes `value` under `key` in `bucket`, replacing any previous value.
    pub async fn put(&self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO redirect_buckets (bucket, key, value)
            VALUES (?, ?, ?)
            ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(bucket)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn scan(&self, bucket: &str) -> Result<Pairs> {
        trace!(bucket = %bucket, "scanning sqlite bucket");

        let rows = sqlx::query(
            r#"
            SELECT key, value
            FROM redirect_buckets
            WHERE bucket = ?
            "#,
        )
        .bind(bucket)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let pairs = rows
            .iter()
            .map(|row| -> Result<(Vec<u8>, Vec<u8>)> {
                let key: Vec<u8> = row.try_get("key").map_err(map_sqlx_error)?;
                let value: Vec<u8> = row.try_get("value").map_err(map_sqlx_error)?;
                Ok((key, value))
            })
            .collect::<Result<Pairs>>()?;

        debug!(bucket = %bucket, entries = pairs.len(), "scanned sqlite bucket");
        Ok(pairs)
    }

    async fn close(self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
