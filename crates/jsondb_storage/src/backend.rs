//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-file storage backend for jsondb.
///
/// Storage backends are **opaque byte stores** holding exactly one blob: the
/// serialized database. jsondb owns format interpretation - backends do not
/// understand collections or documents.
///
/// # Invariants
///
/// - `load` returns `None` until the first successful `replace`
///   (or if the underlying file does not exist)
/// - after `replace(data)` returns, `load` returns exactly `data`
/// - a failed `replace` leaves the previous contents readable
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the entire stored blob.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the stored blob with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous contents are left
    /// in place when the backend supports atomic replacement.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns whether a blob is currently stored.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;

    /// Returns the size of the stored blob in bytes (0 if absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Short human-readable description of where the data lives.
    fn describe(&self) -> String;
}
