//! File persistence for objson objects.
//!
//! A saved file holds exactly the compact JSON encoding of one object: no
//! header, no version, no checksum. [`PersistenceFacade`] saves and loads
//! through a [`ByteStore`]; [`Document`] bundles an object with its
//! [`LoadState`] so auto-persistence can tell whether the first load has
//! happened yet.

pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod facade;

#[cfg(test)]
mod fixtures;

pub use backend::{ByteStore, FsStore, MemoryStore};
pub use config::PersistConfig;
pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use facade::{LoadState, Persistable, PersistenceFacade};
