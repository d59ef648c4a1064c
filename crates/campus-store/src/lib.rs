//! Campus Storage Layer
//!
//! Implements the [`LinkStore`] and [`ObjectStore`] traits twice:
//!
//! - [`SqliteStore`]: one row per link in SQLite, every commit in a single
//!   transaction
//! - [`MemoryStore`]: a HashMap side table, for tests and embedding
//!
//! # Examples
//!
//! ```no_run
//! use campus_domain::{LinkStore, ObjectId};
//! use campus_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! let links = store.link_set(ObjectId::new()).unwrap();
//! assert!(links.is_empty());
//! ```
//!
//! [`LinkStore`]: campus_domain::LinkStore
//! [`ObjectStore`]: campus_domain::ObjectStore

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use campus_domain::{LinkSetError, ObjectId};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Stored links violate link set uniqueness
    #[error("Corrupt link set for {owner}: {source}")]
    CorruptLinkSet {
        /// Owner of the offending link set
        owner: ObjectId,
        /// The violation
        source: LinkSetError,
    },

    /// The store refuses writes
    #[error("Store is read-only")]
    ReadOnly,
}
