//! CLI command implementations.

use jsondb_core::{Config, Database};
use std::path::Path;

pub mod backup;
pub mod inspect;
pub mod sweep;
pub mod verify;

/// Opens an existing database file without creating it.
pub(crate) fn open_existing(path: &Path) -> Result<Database, Box<dyn std::error::Error>> {
    let config = Config::new()
        .create_if_missing(false)
        .create_parent_dirs(false);
    Ok(Database::open_with_config(path, config)?)
}

/// Formats a byte count for display.
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
