//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The temporary file could not be moved over the target.
    #[error("failed to replace {path}: {source}")]
    ReplaceFailed {
        /// The file that was being replaced.
        path: PathBuf,
        /// The underlying rename error.
        source: io::Error,
    },

    /// The backing path is not usable as a database file.
    #[error("invalid storage path {path}: {reason}")]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },
}
