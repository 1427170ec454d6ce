//! Persistent [`KeyValueStore`] backends for Detour redirect tables.

pub mod backend;
pub mod redis;
pub mod sqlite;

pub use backend::StoreBackend;
pub use detour_core::{InMemoryStore, KeyValueStore, Pairs, StoreError};
pub use self::redis::RedisStore;
pub use sqlite::SqliteStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
