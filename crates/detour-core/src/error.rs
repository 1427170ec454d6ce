use thiserror::Error;

use crate::source::Format;

/// Result type for building redirect tables.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Errors returned while turning a source into a redirect table.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The source bytes are not well-formed or do not have the record shape.
    #[error("failed to decode {format} source: {message}")]
    Decode { format: Format, message: String },
    /// The store bucket held no entries.
    #[error("bucket '{bucket}' has no redirect entries")]
    EmptySource { bucket: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SourceError {
    pub(crate) fn decode(format: Format, message: impl ToString) -> Self {
        Self::Decode {
            format,
            message: message.to_string(),
        }
    }
}
