//! Error types for jsondb core.

use crate::document::DocumentId;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in jsondb core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] jsondb_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document with the same id is already present in the collection.
    #[error("duplicate key: document {id} already exists in collection '{collection}'")]
    DuplicateKey {
        /// The collection written to.
        collection: String,
        /// The conflicting id.
        id: DocumentId,
    },

    /// No document with the given id exists in the collection.
    #[error("document {id} not found in collection '{collection}'")]
    DocumentNotFound {
        /// The collection searched.
        collection: String,
        /// The id that was not found.
        id: DocumentId,
    },

    /// A database or backup file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An aggregate found no numeric values to reduce.
    #[error("no numeric data for field '{key}' in collection '{collection}'")]
    NoNumericData {
        /// The collection aggregated.
        collection: String,
        /// The field aggregated.
        key: String,
    },

    /// Stored data exists but is not a valid database.
    #[error("corrupt data: {message}")]
    CorruptData {
        /// Description of the problem.
        message: String,
    },

    /// A document or patch has the wrong shape.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },

    /// Operation or argument not permitted.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

/// Coarse classification of a [`CoreError`].
///
/// Callers branch on the kind rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Insert with an id already present.
    DuplicateKey,
    /// Missing document or missing file.
    NotFound,
    /// Aggregate over a set with no numbers.
    NoNumericData,
    /// Stored bytes do not decode as a database.
    CorruptData,
    /// The OS failed a read or write.
    IoFailure,
    /// The caller passed a malformed document, patch, or argument.
    InvalidInput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DuplicateKey => "duplicate key",
            Self::NotFound => "not found",
            Self::NoNumericData => "no numeric data",
            Self::CorruptData => "corrupt data",
            Self::IoFailure => "I/O failure",
            Self::InvalidInput => "invalid input",
        };
        f.write_str(name)
    }
}

impl CoreError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(_) | Self::Io(_) => ErrorKind::IoFailure,
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::DocumentNotFound { .. } | Self::FileNotFound { .. } => ErrorKind::NotFound,
            Self::NoNumericData { .. } => ErrorKind::NoNumericData,
            Self::CorruptData { .. } => ErrorKind::CorruptData,
            Self::InvalidDocument { .. } | Self::InvalidOperation { .. } => {
                ErrorKind::InvalidInput
            }
        }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(collection: impl Into<String>, id: DocumentId) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            id,
        }
    }

    /// Creates a document not found error.
    pub fn document_not_found(collection: impl Into<String>, id: DocumentId) -> Self {
        Self::DocumentNotFound {
            collection: collection.into(),
            id,
        }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a no numeric data error.
    pub fn no_numeric_data(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NoNumericData {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// Creates a corrupt data error.
    pub fn corrupt_data(message: impl Into<String>) -> Self {
        Self::CorruptData {
            message: message.into(),
        }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(CoreError::duplicate_key("users", 1).kind(), ErrorKind::DuplicateKey);
        assert_eq!(CoreError::document_not_found("users", 1).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::file_not_found("x.json").kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::no_numeric_data("users", "age").kind(),
            ErrorKind::NoNumericData
        );
        assert_eq!(CoreError::corrupt_data("bad").kind(), ErrorKind::CorruptData);
        assert_eq!(
            CoreError::from(io::Error::new(io::ErrorKind::Other, "disk")).kind(),
            ErrorKind::IoFailure
        );
        assert_eq!(CoreError::invalid_document("x").kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn messages_name_the_collection() {
        let err = CoreError::duplicate_key("users", 7);
        assert_eq!(
            err.to_string(),
            "duplicate key: document 7 already exists in collection 'users'"
        );
    }
}
