//! Benchmark utilities.

#![warn(missing_docs)]

use jsondb_core::{Database, Document, Store};
use rand::Rng;

/// Generate a document with random field values.
pub fn random_document(id: i64) -> Document {
    let mut rng = rand::thread_rng();
    let name: String = (0..12).map(|_| rng.gen_range('a'..='z')).collect();
    Document::new(id)
        .with_field("name", name)
        .with_field("age", rng.gen_range(18..90))
        .with_field("score", f64::from(rng.gen_range(0u32..10_000)) / 4.0)
        .with_field("active", rng.gen_bool(0.5))
}

/// Opens an in-memory database with `count` random documents in "bench".
pub fn populated(count: usize) -> Database {
    let db = Database::open_in_memory().expect("Failed to open database");
    for i in 0..count {
        db.insert("bench", random_document(i as i64))
            .expect("Failed to insert document");
    }
    db
}

/// Builds a store with `count` random documents spread over four collections.
pub fn random_store(count: usize) -> Store {
    let mut store = Store::new();
    for i in 0..count {
        let collection = format!("c{}", i % 4);
        store
            .insert(&collection, random_document(i as i64))
            .expect("Failed to insert document");
    }
    store
}
