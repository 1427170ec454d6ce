use async_trait::async_trait;
use detour_core::{InMemoryStore, KeyValueStore, Pairs};

use crate::{RedisStore, Result, SqliteStore};

/// Any of the supported stores, selected at startup.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    InMemory(InMemoryStore),
    Sqlite(SqliteStore),
    Redis(RedisStore),
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::InMemory(_) => "in-memory",
            StoreBackend::Sqlite(_) => "sqlite",
            StoreBackend::Redis(_) => "redis",
        }
    }
}

#[async_trait]
impl KeyValueStore for StoreBackend {
    async fn scan(&self, bucket: &str) -> Result<Pairs> {
        match self {
            StoreBackend::InMemory(store) => store.scan(bucket).await,
            StoreBackend::Sqlite(store) => store.scan(bucket).await,
            StoreBackend::Redis(store) => store.scan(bucket).await,
        }
    }

    async fn close(self) -> Result<()> {
        match self {
            StoreBackend::InMemory(store) => store.close().await,
            StoreBackend::Sqlite(store) => store.close().await,
            StoreBackend::Redis(store) => store.close().await,
        }
    }
}

impl From<InMemoryStore> for StoreBackend {
    fn from(store: InMemoryStore) -> Self {
        Self::InMemory(store)
    }
}

impl From<SqliteStore> for StoreBackend {
    fn from(store: SqliteStore) -> Self {
        Self::Sqlite(store)
    }
}

impl From<RedisStore> for StoreBackend {
    fn from(store: RedisStore) -> Self {
        Self::Redis(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detour_core::{RedirectTable, Resolver, Source, SourceError};

    #[tokio::test]
    async fn dispatches_to_in_memory() {
        let store = InMemoryStore::new();
        store.put("redirects", "/a", "https://a");
        store.put("redirects", "/b", "https://b");
        let backend = StoreBackend::from(store);
        assert_eq!(backend.name(), "in-memory");

        let table = Source::Store {
            store: backend,
            bucket: "redirects".to_string(),
        }
        .load()
        .await
        .unwrap();

        let resolver = Resolver::new(table);
        assert!(matches!(
            resolver.resolve("/a"),
            detour_core::Action::Redirect { url: "https://a", .. }
        ));
        assert_eq!(resolver.resolve("/c"), detour_core::Action::Delegate);
    }

    #[tokio::test]
    async fn empty_backend_bucket() {
        let backend = StoreBackend::from(InMemoryStore::new());

        let err = RedirectTable::from_store(backend, "redirects")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::EmptySource { .. }));
    }
}
