//! Backup and restore of the database file.
//!
//! A backup is a verbatim copy of the backing file, so a backup file is
//! itself a valid database file:
//!
//! ```text
//! { "users": [ { "id": 1, "name": "Alice" } ], "sessions": [] }
//! ```
//!
//! Backups are written with the same temp-file-then-rename strategy as
//! the database itself.

use crate::error::{CoreError, CoreResult};
use crate::persistence::decode_store;
use crate::store::Store;
use jsondb_storage::{FileBackend, StorageBackend};
use std::path::Path;

/// Summary of a backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Size of the backup in bytes.
    pub size: u64,
    /// Number of collections.
    pub collection_count: usize,
    /// Number of documents across all collections, expired or not.
    pub document_count: usize,
}

/// Writes `data` to `path`, creating parent directories as needed.
///
/// Returns the number of bytes written.
pub(crate) fn write_backup(data: &[u8], path: &Path) -> CoreResult<u64> {
    let mut backend = FileBackend::open_with_create_dirs(path)?;
    backend.replace(data)?;
    Ok(data.len() as u64)
}

/// Reads and parses a backup file.
///
/// # Errors
///
/// Returns `FileNotFound` if `path` does not exist and `CorruptData` if
/// it does not parse.
pub fn read_backup(path: &Path) -> CoreResult<(Store, u64)> {
    let backend = FileBackend::open(path)?;
    let data = backend
        .load()?
        .ok_or_else(|| CoreError::file_not_found(path))?;
    let store = decode_store(&data)?;
    Ok((store, data.len() as u64))
}

/// Validates a backup file without restoring it.
///
/// # Errors
///
/// Same as [`read_backup`].
pub fn inspect_backup(path: &Path) -> CoreResult<BackupInfo> {
    let (store, size) = read_backup(path)?;
    Ok(BackupInfo {
        size,
        collection_count: store.collection_names().len(),
        document_count: store.document_count(),
    })
}
