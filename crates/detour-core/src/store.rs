use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, trace, warn};

use crate::error::{Result, SourceError, StoreError};
use crate::source::Format;
use crate::table::RedirectTable;

/// Raw key/value pairs as read from a store bucket.
pub type Pairs = Vec<(Vec<u8>, Vec<u8>)>;

/// A persistent key/value store partitioned into named buckets.
///
/// Keys and values are opaque bytes; the redirect engine reads keys as
/// paths and values as URLs. A handle is consumed by [`close`](Self::close)
/// and is unusable afterwards.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns every key/value pair in `bucket`.
    ///
    /// A missing bucket is reported as an empty result, not an error.
    async fn scan(&self, bucket: &str) -> std::result::Result<Pairs, StoreError>;

    /// Releases the handle.
    async fn close(self) -> std::result::Result<(), StoreError>;
}

impl RedirectTable {
    /// Builds a table from every entry of `bucket`, then closes `store`.
    ///
    /// The handle is closed on every path out of this function, including
    /// scan failures, undecodable entries and empty buckets. A bucket with no
    /// entries yields [`SourceError::EmptySource`] so that callers can tell
    /// "no data yet" apart from corrupt data.
    pub async fn from_store<S: KeyValueStore>(store: S, bucket: &str) -> Result<Self> {
        trace!(bucket = %bucket, "scanning store bucket");
        let scanned = store.scan(bucket).await;

        match store.close().await {
            Ok(()) => trace!(bucket = %bucket, "store handle closed"),
            Err(e) => warn!(bucket = %bucket, error = %e, "failed to close store handle"),
        }

        let pairs = scanned?;
        if pairs.is_empty() {
            return Err(SourceError::EmptySource {
                bucket: bucket.to_string(),
            });
        }

        let table = pairs
            .into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                Ok((utf8(key, "key")?, utf8(value, "value")?))
            })
            .collect::<Result<RedirectTable>>()?;

        debug!(bucket = %bucket, entries = table.len(), "built redirect table from store");
        Ok(table)
    }
}

fn utf8(bytes: Vec<u8>, what: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        SourceError::decode(Format::Store, format!("{what} is not valid UTF-8: {e}"))
    })
}

/// In-memory [`KeyValueStore`] backed by `DashMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    buckets: DashMap<String, HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` in `bucket`, creating the bucket if needed.
    pub fn put(&self, bucket: &str, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn scan(&self, bucket: &str) -> std::result::Result<Pairs, StoreError> {
        Ok(self
            .buckets
            .get(bucket)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn close(self) -> std::result::Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Store that records whether it was closed.
    struct TrackedStore {
        result: std::result::Result<Pairs, StoreError>,
        closed: Arc<AtomicBool>,
    }

    impl TrackedStore {
        fn new(result: std::result::Result<Pairs, StoreError>) -> (Self, Arc<AtomicBool>) {
            let closed = Arc::new(AtomicBool::new(false));
            let store = Self {
                result,
                closed: Arc::clone(&closed),
            };
            (store, closed)
        }
    }

    #[async_trait]
    impl KeyValueStore for TrackedStore {
        async fn scan(&self, _bucket: &str) -> std::result::Result<Pairs, StoreError> {
            self.result.clone()
        }

        async fn close(self) -> std::result::Result<(), StoreError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pair(k: &str, v: &str) -> (Vec<u8>, Vec<u8>) {
        (k.as_bytes().to_vec(), v.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn builds_table_from_bucket() {
        let store = InMemoryStore::new();
        store.put("redirects", "/a", "https://a");
        store.put("redirects", "/b", "https://b");
        store.put("other", "/c", "https://c");

        let table = RedirectTable::from_store(store, "redirects").await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("/a"), Some("https://a"));
        assert_eq!(table.get("/b"), Some("https://b"));
        assert_eq!(table.get("/c"), None);
    }

    #[tokio::test]
    async fn empty_bucket_is_empty_source() {
        let store = InMemoryStore::new();

        let err = RedirectTable::from_store(store, "redirects")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::EmptySource { ref bucket } if bucket == "redirects"));
    }

    #[tokio::test]
    async fn closes_after_success() {
        let (store, closed) = TrackedStore::new(Ok(vec![pair("/a", "https://a")]));

        RedirectTable::from_store(store, "b").await.unwrap();
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn closes_after_scan_failure() {
        let (store, closed) =
            TrackedStore::new(Err(StoreError::Unavailable("connection reset".into())));

        let err = RedirectTable::from_store(store, "b").await.unwrap_err();
        assert!(matches!(err, SourceError::Store(StoreError::Unavailable(_))));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn closes_when_empty() {
        let (store, closed) = TrackedStore::new(Ok(vec![]));

        let err = RedirectTable::from_store(store, "b").await.unwrap_err();
        assert!(matches!(err, SourceError::EmptySource { .. }));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn invalid_utf8_is_decode_error() {
        let (store, closed) = TrackedStore::new(Ok(vec![(
            b"/bad".to_vec(),
            vec![0xff, 0xfe, 0xfd],
        )]));

        let err = RedirectTable::from_store(store, "b").await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Decode {
                format: Format::Store,
                ..
            }
        ));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn put_overwrites_key() {
        let store = InMemoryStore::new();
        store.put("r", "/a", "https://old");
        store.put("r", "/a", "https://new");

        let pairs = store.scan("r").await.unwrap();
        assert_eq!(pairs, vec![pair("/a", "https://new")]);
    }
}
