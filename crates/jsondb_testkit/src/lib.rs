//! # jsondb Testkit
//!
//! Test utilities for jsondb.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//! - A model harness that checks a database against a plain in-memory model
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jsondb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_database() {
//!     with_temp_db(|db| {
//!         db.insert("users", Document::new(1)).unwrap();
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use jsondb_core::{AggregateOp, Database, Document, ErrorKind, SortOrder};
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
