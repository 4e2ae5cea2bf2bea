//! In-memory collection store.
//!
//! The [`Store`] is the root persisted object: a mapping from collection
//! name to an insertion-ordered sequence of documents. It serializes as a
//! single JSON object whose keys are collection names and whose values are
//! arrays of documents.
//!
//! The store itself never touches storage; [`crate::Database`] persists it
//! after every mutation.

use crate::document::{Document, DocumentId};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Mapping from collection name to its documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    collections: BTreeMap<String, Vec<Document>>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarantees the named collection exists, creating it empty if needed.
    pub fn ensure_collection(&mut self, name: &str) -> &mut Vec<Document> {
        self.collections.entry(name.to_string()).or_default()
    }

    /// Returns the documents of a collection, or an empty slice if it
    /// has never been written.
    #[must_use]
    pub fn documents(&self, name: &str) -> &[Document] {
        self.collections.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns whether a collection key is present.
    #[must_use]
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Returns the collection names in sorted order.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Iterates over `(name, documents)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Document])> {
        self.collections
            .iter()
            .map(|(name, docs)| (name.as_str(), docs.as_slice()))
    }

    /// Total number of documents across all collections, expired or not.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// Appends a document to a collection.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a document with the same id is present,
    /// whether or not it has expired, and `InvalidDocument` if an extra
    /// field uses a reserved name.
    pub fn insert(&mut self, collection: &str, doc: Document) -> CoreResult<()> {
        doc.validate()?;
        let docs = self.ensure_collection(collection);
        if docs.iter().any(|d| d.id() == doc.id()) {
            return Err(CoreError::duplicate_key(collection, doc.id()));
        }
        docs.push(doc);
        Ok(())
    }

    /// Shallow-merges `patch` into the document with the given id and
    /// returns the updated document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if no such document exists, or
    /// `InvalidDocument` if the patch is malformed.
    pub fn update(
        &mut self,
        collection: &str,
        id: DocumentId,
        patch: Map<String, Value>,
    ) -> CoreResult<Document> {
        let doc = self
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id() == id))
            .ok_or_else(|| CoreError::document_not_found(collection, id))?;

        doc.merge(patch)?;
        Ok(doc.clone())
    }

    /// Removes every document with the given id and returns how many
    /// were removed.
    pub fn delete(&mut self, collection: &str, id: DocumentId) -> usize {
        let docs = self.ensure_collection(collection);
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        before - docs.len()
    }

    /// Replaces a collection with an empty sequence.
    pub fn clear(&mut self, collection: &str) {
        self.collections.insert(collection.to_string(), Vec::new());
    }

    /// Removes a collection key entirely. Returns whether it existed.
    pub fn drop_collection(&mut self, collection: &str) -> bool {
        self.collections.remove(collection).is_some()
    }

    /// Removes documents of one collection that are expired at `now`.
    ///
    /// Creates the collection if missing. Returns the number removed.
    pub fn sweep(&mut self, collection: &str, now: i64) -> usize {
        let docs = self.ensure_collection(collection);
        let before = docs.len();
        docs.retain(|d| !d.is_expired(now));
        before - docs.len()
    }

    /// Removes expired documents from every collection.
    pub fn sweep_all(&mut self, now: i64) -> usize {
        let mut removed = 0;
        for docs in self.collections.values_mut() {
            let before = docs.len();
            docs.retain(|d| !d.is_expired(now));
            removed += before - docs.len();
        }
        removed
    }

    /// Counts documents of a collection that are expired at `now` but
    /// still present.
    #[must_use]
    pub fn expired_count(&self, collection: &str, now: i64) -> usize {
        self.documents(collection)
            .iter()
            .filter(|d| d.is_expired(now))
            .count()
    }

    /// Finds ids that occur more than once within a collection.
    ///
    /// A store built through [`Store::insert`] never has any; a hand-edited
    /// file might. Each offending `(collection, id)` pair is listed once.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<(String, DocumentId)> {
        let mut duplicates = Vec::new();
        for (name, docs) in &self.collections {
            let mut seen = std::collections::BTreeSet::new();
            let mut reported = std::collections::BTreeSet::new();
            for doc in docs {
                if !seen.insert(doc.id()) && reported.insert(doc.id()) {
                    duplicates.push((name.clone(), doc.id()));
                }
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn never_written_collection_is_empty() {
        let store = Store::new();
        assert!(store.documents("ghosts").is_empty());
        assert!(!store.has_collection("ghosts"));
    }

    #[test]
    fn ensure_collection_is_idempotent() {
        let mut store = Store::new();
        store.insert("users", Document::new(1)).unwrap();
        store.ensure_collection("users");
        store.ensure_collection("posts");

        assert_eq!(store.documents("users").len(), 1);
        assert!(store.has_collection("posts"));
    }

    #[test]
    fn insert_preserves_order() {
        let mut store = Store::new();
        for id in [3, 1, 2] {
            store.insert("items", Document::new(id)).unwrap();
        }
        let ids: Vec<_> = store.documents("items").iter().map(Document::id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn insert_duplicate_rejected() {
        let mut store = Store::new();
        store.insert("users", Document::new(1)).unwrap();
        let err = store.insert("users", Document::new(1)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateKey { id: 1, .. }));

        // Same id in another collection is fine
        store.insert("posts", Document::new(1)).unwrap();
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut store = Store::new();
        let err = store.update("users", 9, patch(json!({"a": 1}))).unwrap_err();
        assert!(matches!(err, CoreError::DocumentNotFound { id: 9, .. }));
    }

    #[test]
    fn delete_counts_removed() {
        let mut store = Store::new();
        store.insert("users", Document::new(1)).unwrap();
        store.insert("users", Document::new(2)).unwrap();

        assert_eq!(store.delete("users", 1), 1);
        assert_eq!(store.delete("users", 1), 0);
        assert_eq!(store.documents("users").len(), 1);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let mut store = Store::new();
        store.insert("s", Document::new(1).with_expiry(10)).unwrap();
        store.insert("s", Document::new(2).with_expiry(20)).unwrap();
        store.insert("s", Document::new(3)).unwrap();

        assert_eq!(store.expired_count("s", 15), 1);
        assert_eq!(store.sweep("s", 15), 1);
        let ids: Vec<_> = store.documents("s").iter().map(Document::id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn sweep_all_covers_every_collection() {
        let mut store = Store::new();
        store.insert("a", Document::new(1).with_expiry(1)).unwrap();
        store.insert("b", Document::new(1).with_expiry(1)).unwrap();
        store.insert("b", Document::new(2)).unwrap();

        assert_eq!(store.sweep_all(5), 2);
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn serializes_as_object_of_arrays() {
        let mut store = Store::new();
        store
            .insert("users", Document::new(1).with_field("name", "Alice"))
            .unwrap();
        store.ensure_collection("empty");

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(
            value,
            json!({"empty": [], "users": [{"id": 1, "name": "Alice"}]})
        );

        let back: Store = serde_json::from_value(value).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn duplicate_ids_from_decoded_file() {
        let store: Store = serde_json::from_value(json!({
            "a": [{"id": 1}, {"id": 2}, {"id": 1}, {"id": 1}],
            "b": [{"id": 1}]
        }))
        .unwrap();

        assert_eq!(store.duplicate_ids(), vec![("a".to_string(), 1)]);
        assert!(Store::new().duplicate_ids().is_empty());
    }

    #[test]
    fn insert_rejects_reserved_extra_field() {
        let mut store = Store::new();
        let err = store
            .insert("users", Document::new(1).with_field("id", "one"))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDocument { .. }));
        assert!(store.documents("users").is_empty());
    }
}
