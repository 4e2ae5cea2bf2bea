//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend keeps the serialized database in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral databases that don't need persistence
///
/// # Example
///
/// ```rust
/// use jsondb_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.replace(b"{}").unwrap();
/// assert_eq!(backend.size().unwrap(), 2);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing data.
    ///
    /// Useful for testing load and corruption scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }

    /// Returns a copy of the stored data, if any.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }
}

impl StorageBackend for InMemoryBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.data.read().is_some())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().as_ref().map_or(0, |d| d.len() as u64))
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_starts_empty() {
        let backend = InMemoryBackend::new();
        assert!(!backend.exists().unwrap());
        assert_eq!(backend.load().unwrap(), None);
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn memory_replace_and_load() {
        let mut backend = InMemoryBackend::new();
        backend.replace(b"first").unwrap();
        backend.replace(b"second").unwrap();

        assert_eq!(backend.load().unwrap().unwrap(), b"second");
        assert_eq!(backend.size().unwrap(), 6);
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(b"{}".to_vec());
        assert!(backend.exists().unwrap());
        assert_eq!(backend.data(), Some(b"{}".to_vec()));
    }
}
