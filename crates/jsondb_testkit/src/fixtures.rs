//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use jsondb_core::{Config, Database};
use jsondb_storage::FileBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name used for file-backed test databases.
pub const TEST_DB_FILE: &str = "test.json";

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        Self {
            db: Database::open_in_memory().expect("Failed to open in-memory database"),
            temp_dir: None,
        }
    }

    /// Creates a new file-based test database.
    pub fn file() -> Self {
        Self::file_with_config(Config::default())
    }

    /// Creates a new file-based test database with custom configuration.
    pub fn file_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(TEST_DB_FILE);

        let backend = FileBackend::open_with_create_dirs(&path)
            .expect("Failed to create file backend")
            .sync_on_write(config.sync_on_write);
        let db = Database::open_with_backend(config, Box::new(backend))
            .expect("Failed to open file database");

        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the database file path if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().join(TEST_DB_FILE))
    }

    /// Returns the temporary directory if file-based.
    pub fn dir(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Closes and reopens a file-based database, returning a fresh handle
    /// on the same file.
    pub fn reopen(self) -> Self {
        let Self { db, temp_dir } = self;
        let config = db.config().clone();
        drop(db);

        let temp_dir = temp_dir.expect("Only file databases can be reopened");
        let path = temp_dir.path().join(TEST_DB_FILE);
        let db = Database::open_with_config(&path, config).expect("Failed to reopen database");
        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use jsondb_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(|db| {
///         db.insert("test", Document::new(1)).unwrap();
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory();
    f(&test_db.db)
}

/// Runs a test with a temporary file-based database.
///
/// The closure receives the database file path; the containing directory
/// is a scratch area the test may also use (for backups, say).
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::file();
    let path = test_db.path().expect("File database should have a path");
    f(&test_db.db, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use jsondb_core::{now_millis, Document};

    /// Creates a database holding the two-user example:
    /// Alice (id 1, age 25) inserted before Bob (id 2, age 30).
    pub fn users_database() -> TestDatabase {
        let test_db = TestDatabase::memory();
        test_db
            .insert(
                "users",
                Document::new(1).with_field("name", "Alice").with_field("age", 25),
            )
            .expect("Failed to insert Alice");
        test_db
            .insert(
                "users",
                Document::new(2).with_field("name", "Bob").with_field("age", 30),
            )
            .expect("Failed to insert Bob");
        test_db
    }

    /// Creates a database with `count` documents in collection "test",
    /// ids `0..count`, each with an `index` field equal to its id.
    pub fn populated_database(count: usize) -> TestDatabase {
        let test_db = TestDatabase::memory();
        for i in 0..count {
            let id = i as i64;
            test_db
                .insert("test", Document::new(id).with_field("index", id))
                .expect("Failed to insert document");
        }
        test_db
    }

    /// Creates a database with one document per collection, named
    /// `collection_0`, `collection_1`, ...
    pub fn multi_collection_database(collection_count: usize) -> (TestDatabase, Vec<String>) {
        let test_db = TestDatabase::memory();
        let mut collections = Vec::with_capacity(collection_count);

        for i in 0..collection_count {
            let name = format!("collection_{}", i);
            test_db
                .insert(&name, Document::new(1).with_field("collection", i as i64))
                .expect("Failed to insert document");
            collections.push(name);
        }

        (test_db, collections)
    }

    /// Creates a "sessions" collection holding `expired` already-expired
    /// documents followed by `live` documents that expire in an hour.
    pub fn sessions_database(expired: usize, live: usize) -> TestDatabase {
        let test_db = TestDatabase::memory();
        let now = now_millis();
        for i in 0..expired + live {
            let expires_at = if i < expired { now - 1_000 } else { now + 3_600_000 };
            test_db
                .insert("sessions", Document::new(i as i64).with_expiry(expires_at))
                .expect("Failed to insert session");
        }
        test_db
    }
}
