//! Verify command implementation.

use jsondb_core::{decode_store, now_millis};
use jsondb_storage::{FileBackend, StorageBackend};
use std::path::Path;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of collections checked.
    pub collections_checked: usize,
    /// Number of documents checked.
    pub documents_checked: usize,
    /// Documents already expired but still stored.
    pub expired_documents: usize,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    /// Returns whether no errors were found.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks that the file parses as a database and that ids are unique
/// within every collection. Never writes to the file.
pub fn check(path: &Path) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let backend = FileBackend::open(path)?;
    let Some(data) = backend.load()? else {
        return Err(format!("No database found at {:?}", path).into());
    };

    let mut result = VerifyResult::default();
    let store = match decode_store(&data) {
        Ok(store) => store,
        Err(e) => {
            result.errors.push(format!("File does not parse: {}", e));
            return Ok(result);
        }
    };

    let now = now_millis();
    for (_, docs) in store.iter() {
        result.collections_checked += 1;
        result.documents_checked += docs.len();
        result.expired_documents += docs.iter().filter(|d| d.is_expired(now)).count();
    }
    for (collection, id) in store.duplicate_ids() {
        result
            .errors
            .push(format!("Duplicate id {} in collection '{}'", id, collection));
    }

    Ok(result)
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying database at {:?}", path);
    println!();

    let result = check(path)?;
    println!("  Collections checked: {}", result.collections_checked);
    println!("  Documents checked:   {}", result.documents_checked);
    println!("  Expired (unswept):   {}", result.expired_documents);
    for error in &result.errors {
        println!("  Error: {}", error);
    }

    println!();
    if result.is_ok() {
        println!("✓ Database verification passed");
        Ok(())
    } else {
        println!("✗ Database verification failed");
        Err("Verification failed".into())
    }
}
