//! Backup and restore commands.
//!
//! A backup is a byte-for-byte copy of the database file, so the commands
//! go through the `Database` API and never interpret the bytes themselves.

use super::{format_size, open_existing};
use jsondb_core::{inspect_backup, Database, ErrorKind};
use jsondb_storage::{FileBackend, StorageBackend};
use std::path::Path;
use tracing::{info, warn};

/// Create a backup of the database.
pub fn create(db_path: &Path, output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Creating backup of {:?}", db_path);

    let db = open_existing(db_path)?;
    let written = db.backup(output_path)?;
    let stats = db.collection_stats();

    println!("✓ Backup created successfully");
    println!("  Path: {:?}", output_path);
    println!("  Size: {}", format_size(written));
    println!("  Collections: {}", stats.len());

    Ok(())
}

/// Restore the database from a backup.
///
/// The database file is created if it does not exist yet. A primary file
/// that no longer parses is overwritten with the backup bytes directly.
pub fn restore(db_path: &Path, input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Restoring database from {:?}", input_path);

    // Validate before touching the target
    let info = inspect_backup(input_path)?;

    match Database::open(db_path) {
        Ok(db) => db.restore(input_path)?,
        Err(e) if e.kind() == ErrorKind::CorruptData => {
            warn!("Database at {:?} is corrupt ({}), replacing it", db_path, e);
            let data = FileBackend::open(input_path)?
                .load()?
                .ok_or_else(|| format!("Backup {:?} disappeared", input_path))?;
            FileBackend::open_with_create_dirs(db_path)?.replace(&data)?;
            // Confirm the replaced file opens
            Database::open(db_path)?;
        }
        Err(e) => return Err(e.into()),
    }

    println!("✓ Database restored successfully");
    println!("  Path: {:?}", db_path);
    println!("  Collections restored: {}", info.collection_count);
    println!("  Documents restored: {}", info.document_count);

    Ok(())
}

/// Show backup metadata.
pub fn info(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Reading backup info from {:?}", input_path);

    let info = inspect_backup(input_path)?;

    println!("✓ Backup is valid");
    println!("  Size: {}", format_size(info.size));
    println!("  Collections: {}", info.collection_count);
    println!("  Documents: {}", info.document_count);

    Ok(())
}
