use std::collections::hash_map::{self, Entry};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single path to URL mapping as it appears in a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectEntry {
    /// The request path used as the lookup key.
    pub path: String,
    /// The redirect target. Not validated.
    pub url: String,
}

impl RedirectEntry {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Immutable mapping from request path to redirect target.
///
/// Tables are assembled once and never mutated afterwards; there is no
/// `&mut self` API. When the same path is inserted more than once while
/// building, the last URL wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    entries: HashMap<String, String>,
}

impl RedirectTable {
    /// Returns the target URL for `path`, if mapped.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(path, url)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl From<HashMap<String, String>> for RedirectTable {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, String)> for RedirectTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut entries = HashMap::with_capacity(iter.size_hint().0);

        for (path, url) in iter {
            match entries.entry(path) {
                Entry::Occupied(mut slot) => {
                    debug!(
                        path = %slot.key(),
                        previous = %slot.get(),
                        url = %url,
                        "duplicate path, later entry wins"
                    );
                    slot.insert(url);
                }
                Entry::Vacant(slot) => {
                    slot.insert(url);
                }
            }
        }

        Self { entries }
    }
}

impl FromIterator<RedirectEntry> for RedirectTable {
    fn from_iter<I: IntoIterator<Item = RedirectEntry>>(iter: I) -> Self {
        iter.into_iter().map(|e| (e.path, e.url)).collect()
    }
}

impl IntoIterator for RedirectTable {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_from_entries() {
        let table: RedirectTable = vec![
            RedirectEntry::new("/a", "https://a.example"),
            RedirectEntry::new("/b", "https://b.example"),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("/a"), Some("https://a.example"));
        assert_eq!(table.get("/b"), Some("https://b.example"));
        assert_eq!(table.get("/c"), None);
    }

    #[test]
    fn later_entry_wins() {
        let table: RedirectTable = vec![
            RedirectEntry::new("/dup", "https://first.example"),
            RedirectEntry::new("/dup", "https://second.example"),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("/dup"), Some("https://second.example"));
    }

    #[test]
    fn from_hash_map() {
        let mut map = HashMap::new();
        map.insert("/x".to_string(), "https://x.example".to_string());

        let table = RedirectTable::from(map);
        assert!(table.contains("/x"));
        assert!(!table.is_empty());
    }

    #[test]
    fn lookup_is_exact() {
        let table: RedirectTable = vec![RedirectEntry::new("/blog", "https://blog.example")]
            .into_iter()
            .collect();

        assert_eq!(table.get("/blog/"), None);
        assert_eq!(table.get("/Blog"), None);
        assert_eq!(table.get("blog"), None);
    }

    #[test]
    fn default_is_empty() {
        let table = RedirectTable::default();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }
}
