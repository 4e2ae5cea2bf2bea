//! Sweep command implementation.

use super::open_existing;
use std::path::Path;
use tracing::info;

/// Removes expired documents from every collection.
///
/// With `dry_run`, only counts them and leaves the file untouched.
/// Returns the number of documents removed (or that would be).
pub fn sweep(path: &Path, dry_run: bool) -> Result<usize, Box<dyn std::error::Error>> {
    let db = open_existing(path)?;

    if dry_run {
        return Ok(db.collection_stats().iter().map(|c| c.expired).sum());
    }

    info!("Sweeping expired documents in {:?}", path);
    Ok(db.purge_expired()?)
}

/// Runs the sweep command.
pub fn run(path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let removed = sweep(path, dry_run)?;

    if dry_run {
        println!("Dry run: {} expired documents would be removed", removed);
    } else {
        println!("✓ Removed {} expired documents", removed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondb_core::{Database, Document};
    use tempfile::tempdir;

    fn seeded(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("db.json");
        let db = Database::open(&path).unwrap();
        db.insert("cache", Document::new(1).with_expiry(1)).unwrap();
        db.insert("cache", Document::new(2)).unwrap();
        db.insert("tokens", Document::new(1).with_expiry(1)).unwrap();
        path
    }

    #[test]
    fn dry_run_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = seeded(dir.path());
        let before = std::fs::read(&path).unwrap();

        assert_eq!(sweep(&path, true).unwrap(), 2);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn sweep_removes_expired() {
        let dir = tempdir().unwrap();
        let path = seeded(dir.path());

        assert_eq!(sweep(&path, false).unwrap(), 2);
        assert_eq!(sweep(&path, true).unwrap(), 0);

        let db = Database::open(&path).unwrap();
        assert_eq!(db.snapshot().document_count(), 1);
    }
}
