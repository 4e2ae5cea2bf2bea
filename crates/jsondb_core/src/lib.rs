//! # jsondb Core
//!
//! Embedded document store persisted to a single JSON file.
//!
//! This crate provides:
//! - Named collections of schema-free [`Document`]s with unique integer ids
//! - Whole-file persistence on every mutation
//! - Per-document expiry, swept on every read
//! - Search, sort, pagination, and numeric aggregation
//! - Snapshot transactions with rollback
//! - Backup and restore
//!
//! ## File Format
//!
//! The backing file is one JSON object mapping collection names to arrays
//! of documents, in insertion order:
//!
//! ```json
//! {
//!   "users": [ { "id": 1, "name": "Alice", "age": 25 } ],
//!   "sessions": [ { "id": 7, "expiresAt": 1700000000000 } ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use jsondb_core::{AggregateOp, Database, Document};
//!
//! let db = Database::open_in_memory().unwrap();
//! db.insert("users", Document::new(1).with_field("age", 25)).unwrap();
//! db.insert("users", Document::new(2).with_field("age", 30)).unwrap();
//!
//! let total = db.aggregate("users", "age", AggregateOp::Sum).unwrap();
//! assert_eq!(total, 55.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod config;
mod database;
mod document;
mod error;
mod persistence;
mod query;
mod stats;
mod store;
mod transaction;

pub use backup::{inspect_backup, read_backup, BackupInfo};
pub use config::Config;
pub use database::Database;
pub use document::{now_millis, Document, DocumentId, EXPIRES_AT_FIELD, ID_FIELD};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use persistence::{decode_store, encode_store};
pub use query::{compare_values, values_equal, AggregateOp, SortOrder};
pub use stats::{CollectionStats, DatabaseStats, StatsSnapshot};
pub use store::Store;
pub use transaction::{TransactionManager, TransactionState};

/// Version of the jsondb engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
