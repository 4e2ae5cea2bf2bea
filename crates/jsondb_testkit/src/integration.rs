//! Model-based integration harness.
//!
//! Applies operations to a real database and to a plain in-memory model
//! side by side, asserting that every result agrees.

use crate::generators::DocumentOperation;
use jsondb_core::{Database, Document, ErrorKind};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A test harness that checks a database against a model.
pub struct ModelHarness {
    /// The database instance.
    pub db: Database,
    /// Expected contents per collection, in insertion order.
    model: BTreeMap<String, Vec<Document>>,
}

impl ModelHarness {
    /// Creates a harness over a fresh in-memory database.
    pub fn new() -> Self {
        Self::with_database(Database::open_in_memory().expect("Failed to open database"))
    }

    /// Creates a harness over an existing database, seeding the model
    /// from its current contents.
    pub fn with_database(db: Database) -> Self {
        let model = db
            .snapshot()
            .iter()
            .map(|(name, docs)| (name.to_string(), docs.to_vec()))
            .collect();
        Self { db, model }
    }

    /// Applies one operation to both the database and the model.
    ///
    /// # Panics
    ///
    /// Panics if the database result differs from the model's.
    pub fn apply(&mut self, op: &DocumentOperation) {
        match op {
            DocumentOperation::Insert { collection, doc } => {
                let result = self.db.insert(collection, doc.clone());
                let docs = self.model.entry(collection.clone()).or_default();
                if docs.iter().any(|d| d.id() == doc.id()) {
                    let err = result.expect_err("Duplicate insert should fail");
                    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
                } else {
                    result.expect("Insert should succeed");
                    docs.push(doc.clone());
                }
            }
            DocumentOperation::Update {
                collection,
                id,
                field,
                value,
            } => {
                let mut patch = Map::new();
                patch.insert(field.clone(), value.clone());
                let result = self.db.update(collection, *id, Value::Object(patch));

                let expected = self
                    .model
                    .get_mut(collection)
                    .and_then(|docs| docs.iter_mut().find(|d| d.id() == *id));
                match expected {
                    Some(doc) => {
                        *doc = doc.clone().with_field(field.clone(), value.clone());
                        let updated = result.expect("Update should succeed");
                        assert_eq!(updated, *doc);
                    }
                    None => {
                        let err = result.expect_err("Update of missing id should fail");
                        assert_eq!(err.kind(), ErrorKind::NotFound);
                    }
                }
            }
            DocumentOperation::Delete { collection, id } => {
                let removed = self.db.delete(collection, *id).expect("Delete should succeed");
                let docs = self.model.entry(collection.clone()).or_default();
                let before = docs.len();
                docs.retain(|d| d.id() != *id);
                assert_eq!(removed, before - docs.len());
            }
            DocumentOperation::Clear { collection } => {
                self.db
                    .clear_collection(collection)
                    .expect("Clear should succeed");
                self.model.insert(collection.clone(), Vec::new());
            }
            DocumentOperation::Read { collection } => {
                let actual = self.db.get_all(collection).expect("Read should succeed");
                let expected = self.model.entry(collection.clone()).or_default();
                assert_eq!(&actual, expected, "Collection {} mismatch", collection);
            }
        }
    }

    /// Applies a sequence of operations.
    pub fn apply_all(&mut self, ops: &[DocumentOperation]) {
        for op in ops {
            self.apply(op);
        }
    }

    /// Verifies every tracked collection matches the model.
    pub fn verify_all(&self) {
        for (collection, expected) in &self.model {
            let actual = self.db.get_all(collection).expect("Read should succeed");
            assert_eq!(&actual, expected, "Collection {} mismatch", collection);
        }
    }

    /// Returns the number of documents in the model.
    pub fn tracked_count(&self) -> usize {
        self.model.values().map(Vec::len).sum()
    }
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_tracks_basic_operations() {
        let mut harness = ModelHarness::new();
        let collection = "users".to_string();

        harness.apply_all(&[
            DocumentOperation::Insert {
                collection: collection.clone(),
                doc: Document::new(1).with_field("name", "Alice"),
            },
            DocumentOperation::Insert {
                collection: collection.clone(),
                doc: Document::new(1),
            },
            DocumentOperation::Update {
                collection: collection.clone(),
                id: 1,
                field: "age".to_string(),
                value: Value::from(25),
            },
            DocumentOperation::Update {
                collection: collection.clone(),
                id: 9,
                field: "age".to_string(),
                value: Value::from(1),
            },
            DocumentOperation::Read {
                collection: collection.clone(),
            },
        ]);

        assert_eq!(harness.tracked_count(), 1);
        harness.verify_all();

        harness.apply(&DocumentOperation::Delete { collection, id: 1 });
        assert_eq!(harness.tracked_count(), 0);
        harness.verify_all();
    }
}
