//! Inspect command implementation.

use super::{format_size, open_existing};
use jsondb_core::CollectionStats;
use serde::Serialize;
use std::path::Path;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Number of collections.
    pub collection_count: usize,
    /// Number of documents, expired or not.
    pub document_count: usize,
    /// Number of documents already expired but not yet swept.
    pub expired_count: usize,
    /// Collection statistics (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<CollectionStats>>,
}

/// Gathers inspection data. Does not sweep or rewrite the file.
pub fn collect(
    path: &Path,
    show_collections: bool,
) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let collections = db.collection_stats();

    Ok(InspectResult {
        path: path.display().to_string(),
        file_size: db.file_size()?,
        collection_count: collections.len(),
        document_count: collections.iter().map(|c| c.documents).sum(),
        expired_count: collections.iter().map(|c| c.expired).sum(),
        collections: show_collections.then_some(collections),
    })
}

/// Runs the inspect command.
pub fn run(
    path: &Path,
    show_collections: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = collect(path, show_collections)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("jsondb Database Inspection");
    println!("==========================");
    println!();
    println!("Path: {}", result.path);
    println!("Size: {}", format_size(result.file_size));
    println!();
    println!("Documents:");
    println!("  Collections: {}", result.collection_count);
    println!("  Documents:   {}", result.document_count);
    println!("  Expired:     {}", result.expired_count);

    if let Some(collections) = &result.collections {
        println!();
        println!("Collections:");
        for col in collections {
            println!(
                "  {} - {} documents, {} expired",
                col.name, col.documents, col.expired
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondb_core::{Database, Document};
    use tempfile::tempdir;

    #[test]
    fn collects_counts_without_sweeping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        {
            let db = Database::open(&path).unwrap();
            db.insert("users", Document::new(1)).unwrap();
            db.insert("users", Document::new(2)).unwrap();
            db.insert("cache", Document::new(1).with_expiry(1)).unwrap();
        }
        let before = std::fs::read(&path).unwrap();

        let result = collect(&path, true).unwrap();
        assert_eq!(result.collection_count, 2);
        assert_eq!(result.document_count, 3);
        assert_eq!(result.expired_count, 1);
        assert_eq!(result.file_size, before.len() as u64);
        assert_eq!(result.collections.unwrap()[0].name, "cache");
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn collections_omitted_from_json_unless_requested() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        Database::open(&path).unwrap();

        let result = collect(&path, false).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("collections\""));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect(&dir.path().join("nope.json"), false).is_err());
    }
}
