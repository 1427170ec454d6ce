//! Core types for the Detour redirect engine.
//!
//! A [`RedirectTable`] is built once from a [`Source`] (an in-memory map, a
//! YAML document, a JSON record, or a [`KeyValueStore`] bucket) and handed to
//! a [`Resolver`], which answers every request path with an [`Action`].

pub mod error;
pub mod resolver;
pub mod source;
pub mod store;
pub mod table;

pub use error::{Result, SourceError, StoreError};
pub use resolver::{Action, Resolver, SEE_OTHER};
pub use source::{Format, Source};
pub use store::{InMemoryStore, KeyValueStore, Pairs};
pub use table::{RedirectEntry, RedirectTable};
