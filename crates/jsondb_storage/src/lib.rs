//! # jsondb Storage
//!
//! Storage backend trait and implementations for jsondb.
//!
//! A jsondb database lives in a single file that is rewritten in full on
//! every mutation. Storage backends are **opaque whole-file byte stores** -
//! they do not interpret the JSON they hold.
//!
//! ## Design Principles
//!
//! - Backends load and replace one blob of bytes
//! - No knowledge of collections, documents, or JSON
//! - Must be `Send + Sync` so a database handle can be shared
//! - jsondb owns all format interpretation
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use jsondb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(!backend.exists().unwrap());
//! backend.replace(b"{}").unwrap();
//! assert_eq!(backend.load().unwrap().as_deref(), Some(&b"{}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
