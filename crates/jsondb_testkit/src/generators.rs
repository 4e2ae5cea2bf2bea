//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random documents and operation
//! sequences. Field values avoid floats that would not survive a trip
//! through the JSON file exactly.

use jsondb_core::{AggregateOp, Document, DocumentId, SortOrder, ID_FIELD};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;

/// Ids used by operation sequences. Kept small so operations collide.
pub const OPERATION_ID_RANGE: std::ops::Range<DocumentId> = 0..16;

/// Collections used by operation sequences.
pub const OPERATION_COLLECTIONS: [&str; 3] = ["users", "posts", "cache"];

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("Invalid regex")
}

/// Strategy for generating field names other than `id`.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}")
        .expect("Invalid regex")
        .prop_filter("Field name must not be the id field", |s| s != ID_FIELD)
}

/// Strategy for generating scalar JSON field values.
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        // Quarters are exact in binary and print without rounding
        (-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        prop::string::string_regex("[a-zA-Z0-9 ]{0,16}")
            .expect("Invalid regex")
            .prop_map(Value::from),
    ]
}

/// Strategy for generating the non-reserved fields of a document.
pub fn fields_strategy() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map(field_name_strategy(), field_value_strategy(), 0..5)
}

/// Strategy for generating a document with the given id.
pub fn document_strategy(id: DocumentId) -> impl Strategy<Value = Document> {
    fields_strategy().prop_map(move |fields| {
        fields
            .into_iter()
            .fold(Document::new(id), |doc, (k, v)| doc.with_field(k, v))
    })
}

/// Strategy for generating up to `max` documents with distinct ids, in
/// random insertion order.
pub fn unique_documents_strategy(max: usize) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::btree_set(0i64..10_000, 0..max)
        .prop_map(|ids| ids.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
        .prop_flat_map(|ids| {
            let fields = prop::collection::vec(fields_strategy(), ids.len());
            (Just(ids), fields)
        })
        .prop_map(|(ids, fields)| {
            ids.into_iter()
                .zip(fields)
                .map(|(id, fields)| {
                    fields
                        .into_iter()
                        .fold(Document::new(id), |doc, (k, v)| doc.with_field(k, v))
                })
                .collect()
        })
}

/// Strategy for generating a sort direction.
pub fn sort_order_strategy() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
}

/// Strategy for generating an aggregate operation.
pub fn aggregate_op_strategy() -> impl Strategy<Value = AggregateOp> {
    prop_oneof![
        Just(AggregateOp::Sum),
        Just(AggregateOp::Avg),
        Just(AggregateOp::Min),
        Just(AggregateOp::Max),
    ]
}

/// A single collection operation.
#[derive(Debug, Clone)]
pub enum DocumentOperation {
    /// Insert a document
    Insert {
        /// Target collection
        collection: String,
        /// Document to insert
        doc: Document,
    },
    /// Set one field of a document
    Update {
        /// Target collection
        collection: String,
        /// Document id
        id: DocumentId,
        /// Field name
        field: String,
        /// New value
        value: Value,
    },
    /// Delete a document
    Delete {
        /// Target collection
        collection: String,
        /// Document id
        id: DocumentId,
    },
    /// Empty a collection
    Clear {
        /// Target collection
        collection: String,
    },
    /// Read a whole collection
    Read {
        /// Target collection
        collection: String,
    },
}

fn operation_collection_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(OPERATION_COLLECTIONS.to_vec()).prop_map(String::from)
}

/// Strategy for generating collection operations.
pub fn document_operation_strategy() -> impl Strategy<Value = DocumentOperation> {
    prop_oneof![
        4 => (operation_collection_strategy(), OPERATION_ID_RANGE)
            .prop_flat_map(|(collection, id)| {
                document_strategy(id).prop_map(move |doc| DocumentOperation::Insert {
                    collection: collection.clone(),
                    doc,
                })
            }),
        2 => (
            operation_collection_strategy(),
            OPERATION_ID_RANGE,
            field_name_strategy(),
            field_value_strategy(),
        )
            .prop_map(|(collection, id, field, value)| DocumentOperation::Update {
                collection,
                id,
                field,
                value,
            }),
        2 => (operation_collection_strategy(), OPERATION_ID_RANGE)
            .prop_map(|(collection, id)| DocumentOperation::Delete { collection, id }),
        1 => operation_collection_strategy()
            .prop_map(|collection| DocumentOperation::Clear { collection }),
        2 => operation_collection_strategy()
            .prop_map(|collection| DocumentOperation::Read { collection }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<DocumentOperation>> {
    prop::collection::vec(document_operation_strategy(), min_ops..max_ops)
}

/// Proptest configuration for fast property tests.
#[must_use]
pub fn quick_config() -> ProptestConfig {
    ProptestConfig {
        cases: 32,
        max_shrink_iters: 100,
        ..ProptestConfig::default()
    }
}

/// Proptest configuration for file-backed property tests, which are slower.
#[must_use]
pub fn file_config() -> ProptestConfig {
    ProptestConfig {
        cases: 16,
        max_shrink_iters: 50,
        ..ProptestConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(quick_config())]

        #[test]
        fn collection_name_is_valid(name in collection_name_strategy()) {
            let first = name.chars().next();
            prop_assert!(first.is_some_and(|c| c.is_ascii_alphabetic()));
        }

        #[test]
        fn generated_document_parses_back(doc in document_strategy(3)) {
            prop_assert_eq!(doc.id(), 3);
            prop_assert_eq!(Document::from_value(doc.to_value()).unwrap(), doc);
        }

        #[test]
        fn unique_documents_have_unique_ids(docs in unique_documents_strategy(20)) {
            let mut ids: Vec<_> = docs.iter().map(Document::id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), docs.len());
        }
    }
}
