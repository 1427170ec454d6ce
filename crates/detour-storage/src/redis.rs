use std::collections::HashMap;

use async_trait::async_trait;
use detour_core::{KeyValueStore, Pairs, StoreError};
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

use crate::Result;

/// A Redis-backed store where every bucket is a hash.
///
/// Bucket `b` lives at key `<prefix>b`; hash fields are paths and hash
/// values are URLs.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        StoreError::Timeout(message)
    } else if lowered.contains("connection refused") {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

impl RedisStore {
    /// Creates a store over an existing connection with the default
    /// `detour:bucket:` key prefix.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, "detour:bucket:")
    }

    /// Creates a store with a custom key prefix (e.g. `"myapp:redirects:"`).
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    /// Sets `key` to `value` in `bucket`.
    pub async fn put(&self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(self.bucket_key(bucket), key, value)
            .await
            .map_err(|e| map_redis_error("failed to write bucket entry", e))
    }

    fn bucket_key(&self, bucket: &str) -> String {
        format!("{}{}", self.key_prefix, bucket)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn scan(&self, bucket: &str) -> Result<Pairs> {
        let key = self.bucket_key(bucket);
        trace!(bucket = %bucket, key = %key, "scanning redis hash");

        let mut conn = self.conn.clone();
        match conn.hgetall::<_, HashMap<Vec<u8>, Vec<u8>>>(&key).await {
            Ok(entries) => {
                debug!(bucket = %bucket, entries = entries.len(), "scanned redis hash");
                Ok(entries.into_iter().collect())
            }
            Err(e) => {
                warn!(bucket = %bucket, error = %e, "Redis error on scan");
                Err(map_redis_error("failed to read bucket from Redis", e))
            }
        }
    }

    async fn close(self) -> Result<()> {
        // A multiplexed connection shuts down once its last handle is dropped.
        drop(self.conn);
        Ok(())
    }
}
