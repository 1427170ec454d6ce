use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::store::KeyValueStore;
use crate::table::{RedirectEntry, RedirectTable};

/// Encoding a redirect source was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Store,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
            Format::Store => write!(f, "store"),
        }
    }
}

/// Where a redirect table comes from.
///
/// Every variant is turned into a [`RedirectTable`] by [`Source::load`].
#[derive(Debug)]
pub enum Source<S> {
    /// A path to URL map that is already in memory.
    Mapping(HashMap<String, String>),
    /// A YAML sequence of `{path, url}` records.
    Document(Vec<u8>),
    /// A JSON `{path, url}` object, or an array of them.
    FlatRecord(Vec<u8>),
    /// Every entry of `bucket` in a persistent store. The store is closed
    /// once loading finishes.
    Store { store: S, bucket: String },
}

impl<S: KeyValueStore> Source<S> {
    pub async fn load(self) -> Result<RedirectTable> {
        match self {
            Source::Mapping(map) => Ok(RedirectTable::from(map)),
            Source::Document(bytes) => RedirectTable::from_yaml(&bytes),
            Source::FlatRecord(bytes) => RedirectTable::from_json(&bytes),
            Source::Store { store, bucket } => RedirectTable::from_store(store, &bucket).await,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlatRecord {
    One(RedirectEntry),
    Many(Vec<RedirectEntry>),
}

impl RedirectTable {
    /// Parses a YAML document of the form:
    ///
    /// ```yaml
    /// - path: /some-path
    ///   url: https://www.some-url.com/demo
    /// ```
    ///
    /// Records are applied in order, so a repeated path resolves to the URL
    /// of its last occurrence. Any malformed record fails the whole document.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self> {
        let entries: Vec<RedirectEntry> =
            serde_yaml::from_slice(bytes).map_err(|e| SourceError::decode(Format::Yaml, e))?;

        debug!(records = entries.len(), "parsed yaml redirect document");
        Ok(entries.into_iter().collect())
    }

    /// Parses a JSON `{"path": ..., "url": ...}` object into a single-entry
    /// table.
    ///
    /// A single object can only ever describe one mapping. As a superset, a
    /// JSON array of such objects is accepted too and behaves like
    /// [`from_yaml`](Self::from_yaml), last occurrence winning.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let record: FlatRecord =
            serde_json::from_slice(bytes).map_err(|e| SourceError::decode(Format::Json, e))?;

        let table: RedirectTable = match record {
            FlatRecord::One(entry) => std::iter::once(entry).collect(),
            FlatRecord::Many(entries) => entries.into_iter().collect(),
        };

        debug!(entries = table.len(), "parsed json redirect record");
        Ok(table)
    }
}
