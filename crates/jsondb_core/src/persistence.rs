//! Persistence layer.
//!
//! The whole [`Store`] is serialized to JSON and written through a
//! [`StorageBackend`] on every save. There is no append log: each save is a
//! full rewrite of the backing file.

use crate::error::{CoreError, CoreResult};
use crate::store::Store;
use jsondb_storage::StorageBackend;
use tracing::debug;

/// Serializes a store to JSON bytes.
///
/// # Errors
///
/// Returns `CorruptData` if the store cannot be encoded.
pub fn encode_store(store: &Store, pretty: bool) -> CoreResult<Vec<u8>> {
    let result = if pretty {
        serde_json::to_vec_pretty(store)
    } else {
        serde_json::to_vec(store)
    };
    result.map_err(|e| CoreError::corrupt_data(format!("failed to encode store: {e}")))
}

/// Parses JSON bytes as a store.
///
/// # Errors
///
/// Returns `CorruptData` if the bytes are not a JSON object mapping
/// collection names to arrays of documents.
pub fn decode_store(data: &[u8]) -> CoreResult<Store> {
    serde_json::from_slice(data).map_err(|e| CoreError::corrupt_data(e.to_string()))
}

/// Owns the storage backend and moves the store in and out of it.
pub(crate) struct Persistence {
    backend: Box<dyn StorageBackend>,
    pretty: bool,
}

impl Persistence {
    pub(crate) fn new(backend: Box<dyn StorageBackend>, pretty: bool) -> Self {
        Self { backend, pretty }
    }

    /// Loads the store, or writes an empty one if nothing is stored yet.
    pub(crate) fn init(&mut self) -> CoreResult<Store> {
        match self.backend.load()? {
            Some(data) => {
                let store = decode_store(&data)?;
                debug!(
                    location = %self.backend.describe(),
                    bytes = data.len(),
                    "loaded store"
                );
                Ok(store)
            }
            None => {
                let store = Store::new();
                self.save(&store)?;
                debug!(location = %self.backend.describe(), "created empty store");
                Ok(store)
            }
        }
    }

    /// Rewrites the backing storage with `store`. Returns the bytes written.
    pub(crate) fn save(&mut self, store: &Store) -> CoreResult<usize> {
        let data = encode_store(store, self.pretty)?;
        self.backend.replace(&data)?;
        Ok(data.len())
    }

    /// Returns the stored bytes exactly as they are in storage.
    pub(crate) fn raw(&self) -> CoreResult<Option<Vec<u8>>> {
        Ok(self.backend.load()?)
    }

    pub(crate) fn size(&self) -> CoreResult<u64> {
        Ok(self.backend.size()?)
    }

    pub(crate) fn describe(&self) -> String {
        self.backend.describe()
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("location", &self.backend.describe())
            .field("pretty", &self.pretty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::ErrorKind;
    use jsondb_storage::InMemoryBackend;

    #[test]
    fn init_creates_empty_store() {
        let mut persistence = Persistence::new(Box::new(InMemoryBackend::new()), false);
        let store = persistence.init().unwrap();

        assert_eq!(store, Store::new());
        assert_eq!(persistence.raw().unwrap().unwrap(), b"{}");
    }

    #[test]
    fn init_loads_existing() {
        let data = br#"{"users":[{"id":1,"name":"Alice"}]}"#.to_vec();
        let mut persistence = Persistence::new(Box::new(InMemoryBackend::with_data(data)), false);
        let store = persistence.init().unwrap();

        assert_eq!(store.documents("users").len(), 1);
        assert_eq!(store.documents("users")[0].id(), 1);
    }

    #[test]
    fn corrupt_inputs() {
        let inputs: [&[u8]; 5] = [
            b"",
            b"not json",
            b"[]",
            br#"{"users": {"id": 1}}"#,
            br#"{"users": [{"name": "no id"}]}"#,
        ];
        for bad in inputs {
            let mut persistence =
                Persistence::new(Box::new(InMemoryBackend::with_data(bad.to_vec())), false);
            let err = persistence.init().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CorruptData, "input {bad:?}");
        }
    }

    #[test]
    fn pretty_output_is_indented() {
        let mut store = Store::new();
        store.insert("users", Document::new(1)).unwrap();

        let pretty = String::from_utf8(encode_store(&store, true).unwrap()).unwrap();
        assert!(pretty.contains("\n  \"users\""));

        let compact = String::from_utf8(encode_store(&store, false).unwrap()).unwrap();
        assert_eq!(compact, r#"{"users":[{"id":1}]}"#);
    }

    #[test]
    fn save_then_decode() {
        let mut persistence = Persistence::new(Box::new(InMemoryBackend::new()), true);
        let mut store = Store::new();
        store
            .insert("t", Document::new(7).with_field("k", "v"))
            .unwrap();

        let written = persistence.save(&store).unwrap();
        let raw = persistence.raw().unwrap().unwrap();
        assert_eq!(raw.len(), written);
        assert_eq!(decode_store(&raw).unwrap(), store);
    }
}
