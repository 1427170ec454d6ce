use tracing::trace;

use crate::table::RedirectTable;

/// HTTP "See Other". Every redirect uses this status.
pub const SEE_OTHER: u16 = 303;

/// What to do with a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Redirect the client to `url`.
    Redirect { url: &'a str, status: u16 },
    /// No mapping exists; hand the request to the fallback handler untouched.
    Delegate,
}

/// Resolves request paths against an immutable [`RedirectTable`].
///
/// The resolver holds no mutable state, so a single instance can be shared
/// across any number of request tasks behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    table: RedirectTable,
}

impl Resolver {
    pub fn new(table: RedirectTable) -> Self {
        Self { table }
    }

    /// Decides what to do with `path`. Lookup is an exact string match.
    pub fn resolve(&self, path: &str) -> Action<'_> {
        match self.table.get(path) {
            Some(url) => {
                trace!(path = %path, url = %url, "path resolved");
                Action::Redirect {
                    url,
                    status: SEE_OTHER,
                }
            }
            None => {
                trace!(path = %path, "no redirect for path, delegating");
                Action::Delegate
            }
        }
    }

    pub fn table(&self) -> &RedirectTable {
        &self.table
    }
}

impl From<RedirectTable> for Resolver {
    fn from(table: RedirectTable) -> Self {
        Self::new(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RedirectEntry;
    use std::sync::Arc;

    fn resolver(entries: &[(&str, &str)]) -> Resolver {
        entries
            .iter()
            .map(|(p, u)| RedirectEntry::new(*p, *u))
            .collect::<RedirectTable>()
            .into()
    }

    #[test]
    fn redirect_on_hit() {
        let r = resolver(&[("/a", "https://a"), ("/b", "https://b")]);

        assert_eq!(
            r.resolve("/a"),
            Action::Redirect {
                url: "https://a",
                status: SEE_OTHER
            }
        );
        assert_eq!(
            r.resolve("/b"),
            Action::Redirect {
                url: "https://b",
                status: 303
            }
        );
    }

    #[test]
    fn delegate_on_miss() {
        let r = resolver(&[("/a", "https://a")]);

        assert_eq!(r.resolve("/c"), Action::Delegate);
        assert_eq!(r.resolve(""), Action::Delegate);
        assert_eq!(r.resolve("/a/"), Action::Delegate);
    }

    #[test]
    fn empty_resolver_always_delegates() {
        let r = Resolver::default();
        assert_eq!(r.resolve("/"), Action::Delegate);
        assert!(r.table().is_empty());
    }

    #[test]
    fn every_path_resolves_exactly() {
        let entries: Vec<(String, String)> = (0..100)
            .map(|i| (format!("/p{i}"), format!("https://example.com/{i}")))
            .collect();
        let r = Resolver::new(entries.iter().cloned().collect());

        for (path, url) in &entries {
            assert_eq!(
                r.resolve(path),
                Action::Redirect {
                    url: url.as_str(),
                    status: SEE_OTHER
                }
            );
        }
        assert_eq!(r.resolve("/p100"), Action::Delegate);
    }

    #[test]
    fn repeated_resolves_agree() {
        let r = resolver(&[("/a", "https://a")]);

        let first = r.resolve("/a");
        for _ in 0..10 {
            assert_eq!(r.resolve("/a"), first);
            assert_eq!(r.resolve("/z"), Action::Delegate);
        }
    }

    #[test]
    fn concurrent_threads() {
        let r = Arc::new(resolver(&[("/a", "https://a"), ("/b", "https://b")]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        assert_eq!(
                            r.resolve("/a"),
                            Action::Redirect {
                                url: "https://a",
                                status: SEE_OTHER
                            }
                        );
                        assert_eq!(r.resolve("/c"), Action::Delegate);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[tokio::test]
    async fn concurrent_tasks() {
        let r = Arc::new(resolver(&[("/x", "https://x")]));
        let mut handles = vec![];

        for i in 0..32 {
            let r = Arc::clone(&r);
            handles.push(tokio::spawn(async move {
                let hit = matches!(r.resolve("/x"), Action::Redirect { url: "https://x", .. });
                let miss = r.resolve(&format!("/miss-{i}")) == Action::Delegate;
                hit && miss
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }
}
