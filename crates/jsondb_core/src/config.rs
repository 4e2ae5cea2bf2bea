//! Database configuration.

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to create missing parent directories of the database file.
    pub create_parent_dirs: bool,

    /// Whether to write indented JSON (two spaces) instead of compact JSON.
    pub pretty: bool,

    /// Whether to fsync the file on every save (safer but slower).
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            create_parent_dirs: true,
            pretty: true,
            sync_on_write: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to create missing parent directories.
    #[must_use]
    pub const fn create_parent_dirs(mut self, value: bool) -> Self {
        self.create_parent_dirs = value;
        self
    }

    /// Sets whether to write indented JSON.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Sets whether to fsync on every save.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}
