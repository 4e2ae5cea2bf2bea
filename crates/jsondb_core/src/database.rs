//! Database facade.

use crate::backup;
use crate::config::Config;
use crate::document::{now_millis, Document, DocumentId};
use crate::error::{CoreError, CoreResult};
use crate::persistence::Persistence;
use crate::query::{self, AggregateOp, SortOrder};
use crate::stats::{CollectionStats, DatabaseStats, StatsSnapshot};
use crate::store::Store;
use crate::transaction::{TransactionManager, TransactionState};
use jsondb_storage::{FileBackend, InMemoryBackend, StorageBackend};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// The main database handle.
///
/// `Database` owns the in-memory [`Store`] and the file it is persisted to.
/// It provides:
/// - Collection CRUD
/// - Queries and aggregation
/// - Snapshot transactions
/// - Backup and restore
///
/// Every mutating operation rewrites the whole file before it returns.
/// Every read first sweeps expired documents out of the collection it
/// reads, and persists the result, so reads may write.
///
/// # Opening a Database
///
/// ```rust,ignore
/// use jsondb_core::{Database, Document};
/// use std::path::Path;
///
/// let db = Database::open(Path::new("app.json"))?;
/// db.insert("users", Document::new(1).with_field("name", "Alice"))?;
///
/// let alice = db.get_by_id("users", 1)?;
/// ```
///
/// # In-Memory Databases
///
/// For testing, use `Database::open_in_memory()`.
///
/// # Concurrency
///
/// The handle is `Send + Sync` and every method takes `&self`, but it is
/// designed for one logical caller issuing operations one at a time. Two
/// handles on the same file give undefined results.
pub struct Database {
    /// Configuration.
    config: Config,
    /// Live collections.
    store: RwLock<Store>,
    /// Backing storage.
    persistence: Mutex<Persistence>,
    /// Pending rollback snapshot.
    txn_manager: TransactionManager,
    /// Operation counters.
    stats: DatabaseStats,
}

impl Database {
    /// Opens (or creates) a database file with default configuration.
    ///
    /// # Errors
    ///
    /// Returns `CorruptData` if the file exists but is not a valid
    /// database, or an I/O error if it cannot be read or created.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a database file with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use jsondb_core::{Config, Database};
    /// use std::path::Path;
    ///
    /// let config = Config::default().pretty(false).sync_on_write(false);
    /// let db = Database::open_with_config(Path::new("cache.json"), config)?;
    /// ```
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let backend = FileBackend::open(path)?;
        if !config.create_if_missing && !backend.exists()? {
            return Err(CoreError::file_not_found(path));
        }

        let backend = if config.create_parent_dirs {
            FileBackend::open_with_create_dirs(path)?
        } else {
            backend
        };
        let backend = backend.sync_on_write(config.sync_on_write);

        let db = Self::open_with_backend(config, Box::new(backend))?;
        info!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens a database on a pre-configured backend.
    ///
    /// Loads the stored data if present; otherwise writes an empty store.
    pub fn open_with_backend(
        config: Config,
        backend: Box<dyn StorageBackend>,
    ) -> CoreResult<Self> {
        let mut persistence = Persistence::new(backend, config.pretty);
        let store = persistence.init()?;

        Ok(Self {
            config,
            store: RwLock::new(store),
            persistence: Mutex::new(persistence),
            txn_manager: TransactionManager::new(),
            stats: DatabaseStats::new(),
        })
    }

    /// Opens a fresh in-memory database for testing.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_backend(Config::default(), Box::new(InMemoryBackend::new()))
    }

    fn save(&self, store: &Store) -> CoreResult<()> {
        let bytes = self.persistence.lock().save(store)?;
        self.stats.record_save(bytes);
        debug!(bytes, "saved store");
        Ok(())
    }

    /// Sweeps `collection`, persists, and hands the remaining documents to `f`.
    fn with_swept<R>(&self, collection: &str, f: impl FnOnce(&[Document]) -> R) -> CoreResult<R> {
        let mut store = self.store.write();
        let removed = store.sweep(collection, now_millis());
        self.stats.record_sweep(removed);
        if removed > 0 {
            debug!(collection, removed, "swept expired documents");
        }
        self.save(&store)?;
        Ok(f(store.documents(collection)))
    }

    // ========================================================================
    // Collections and CRUD
    // ========================================================================

    /// Guarantees the named collection exists. Does not persist.
    pub fn ensure_collection(&self, collection: &str) {
        self.store.write().ensure_collection(collection);
    }

    /// Returns the names of all collections, sorted.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.store.read().collection_names()
    }

    /// Inserts a document at the end of a collection.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a document with the same id is present.
    /// Expired documents that no read has swept yet still count.
    pub fn insert(&self, collection: &str, doc: Document) -> CoreResult<()> {
        let mut store = self.store.write();
        store.insert(collection, doc)?;
        self.stats.record_insert();
        self.save(&store)
    }

    /// Shallow-merges `patch` (a JSON object) into the document with `id`
    /// and returns the updated document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if no such document exists, or
    /// `InvalidDocument` if `patch` is not an object, tries to change the
    /// id, or carries a non-integer `expiresAt`.
    pub fn update(&self, collection: &str, id: DocumentId, patch: Value) -> CoreResult<Document> {
        let Value::Object(patch) = patch else {
            return Err(CoreError::invalid_document("update patch must be a JSON object"));
        };

        let mut store = self.store.write();
        let updated = store.update(collection, id, patch)?;
        self.stats.record_update();
        self.save(&store)?;
        Ok(updated)
    }

    /// Removes every document with `id`. Persists even when nothing matched.
    ///
    /// Returns the number of documents removed.
    pub fn delete(&self, collection: &str, id: DocumentId) -> CoreResult<usize> {
        let mut store = self.store.write();
        let removed = store.delete(collection, id);
        self.stats.record_delete(removed);
        self.save(&store)?;
        Ok(removed)
    }

    /// Empties a collection.
    pub fn clear_collection(&self, collection: &str) -> CoreResult<()> {
        let mut store = self.store.write();
        store.clear(collection);
        self.save(&store)
    }

    /// Removes a collection entirely. Returns whether it existed.
    pub fn drop_collection(&self, collection: &str) -> CoreResult<bool> {
        let mut store = self.store.write();
        let existed = store.drop_collection(collection);
        self.save(&store)?;
        Ok(existed)
    }

    // ========================================================================
    // Expiry
    // ========================================================================

    /// Removes expired documents from a collection, persists, and returns
    /// what is left.
    pub fn clean_expired_items(&self, collection: &str) -> CoreResult<Vec<Document>> {
        self.with_swept(collection, <[Document]>::to_vec)
    }

    /// Sweeps every collection and persists once.
    ///
    /// Returns the number of documents removed.
    pub fn purge_expired(&self) -> CoreResult<usize> {
        let mut store = self.store.write();
        let removed = store.sweep_all(now_millis());
        self.stats.record_sweep(removed);
        self.save(&store)?;
        info!(removed, "purged expired documents");
        Ok(removed)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns all live documents in insertion order.
    pub fn get_all(&self, collection: &str) -> CoreResult<Vec<Document>> {
        self.with_swept(collection, <[Document]>::to_vec)
    }

    /// Returns the document with `id`, if present.
    pub fn get_by_id(&self, collection: &str, id: DocumentId) -> CoreResult<Option<Document>> {
        self.with_swept(collection, |docs| docs.iter().find(|d| d.id() == id).cloned())
    }

    /// Returns the number of live documents.
    pub fn get_count(&self, collection: &str) -> CoreResult<usize> {
        self.with_swept(collection, <[Document]>::len)
    }

    /// Returns whether a live document with `id` exists.
    pub fn exists(&self, collection: &str, id: DocumentId) -> CoreResult<bool> {
        self.with_swept(collection, |docs| docs.iter().any(|d| d.id() == id))
    }

    /// Returns the live documents matching `predicate`, in insertion order.
    pub fn filter<F>(&self, collection: &str, predicate: F) -> CoreResult<Vec<Document>>
    where
        F: Fn(&Document) -> bool,
    {
        self.with_swept(collection, |docs| {
            docs.iter().filter(|&d| predicate(d)).cloned().collect()
        })
    }

    /// Returns the live documents whose `key` field equals `value`.
    pub fn search(&self, collection: &str, key: &str, value: &Value) -> CoreResult<Vec<Document>> {
        self.with_swept(collection, |docs| query::search(docs, key, value))
    }

    /// Returns the live documents ordered by the `key` field.
    pub fn sort(&self, collection: &str, key: &str, order: SortOrder) -> CoreResult<Vec<Document>> {
        self.with_swept(collection, |docs| query::sort(docs, key, order))
    }

    /// Returns page `page` (1-indexed) of `limit` live documents, in
    /// insertion order.
    pub fn paginate(&self, collection: &str, page: usize, limit: usize) -> CoreResult<Vec<Document>> {
        self.with_swept(collection, |docs| query::paginate(docs, page, limit))
    }

    /// Reduces the numeric values of `key` across live documents.
    ///
    /// # Errors
    ///
    /// Returns `NoNumericData` if no live document has a number in `key`.
    pub fn aggregate(&self, collection: &str, key: &str, op: AggregateOp) -> CoreResult<f64> {
        self.with_swept(collection, |docs| query::aggregate(docs, key, op))?
            .ok_or_else(|| CoreError::no_numeric_data(collection, key))
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Captures a snapshot of the whole store as a rollback target.
    ///
    /// Replaces any snapshot already pending. Does not persist.
    pub fn start_transaction(&self) {
        let store = self.store.read();
        if self.txn_manager.start(&store) {
            debug!("replaced pending transaction snapshot");
        }
        self.stats.record_transaction_start();
    }

    /// Discards the pending snapshot and persists the current store.
    pub fn commit_transaction(&self) -> CoreResult<()> {
        let had_snapshot = self.txn_manager.take().is_some();
        let store = self.store.read();
        self.save(&store)?;
        if had_snapshot {
            self.stats.record_transaction_commit();
        }
        Ok(())
    }

    /// Restores the pending snapshot and persists it.
    ///
    /// No-op when no transaction is pending. Returns whether a snapshot
    /// was restored.
    pub fn rollback_transaction(&self) -> CoreResult<bool> {
        let Some(snapshot) = self.txn_manager.take() else {
            return Ok(false);
        };

        let mut store = self.store.write();
        *store = snapshot;
        self.stats.record_transaction_rollback();
        self.save(&store)?;
        Ok(true)
    }

    /// Returns whether a transaction snapshot is pending.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.txn_manager.is_pending()
    }

    /// Returns the transaction state.
    #[must_use]
    pub fn transaction_state(&self) -> TransactionState {
        self.txn_manager.state()
    }

    /// Executes a function within a transaction.
    ///
    /// If the function returns `Ok`, the transaction is committed.
    /// If it returns `Err`, the store is rolled back and the error returned.
    pub fn transaction<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&Self) -> CoreResult<T>,
    {
        self.start_transaction();
        match f(self) {
            Ok(value) => {
                self.commit_transaction()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.rollback_transaction() {
                    warn!(error = %rollback_err, "rollback after failed transaction failed");
                }
                Err(e)
            }
        }
    }

    // ========================================================================
    // Backup and Restore
    // ========================================================================

    /// Copies the backing file byte-for-byte to `path`.
    ///
    /// Returns the number of bytes written.
    pub fn backup(&self, path: &Path) -> CoreResult<u64> {
        let data = {
            let persistence = self.persistence.lock();
            persistence
                .raw()?
                .ok_or_else(|| CoreError::file_not_found(persistence.describe()))?
        };
        let written = backup::write_backup(&data, path)?;
        info!(path = %path.display(), bytes = written, "created backup");
        Ok(written)
    }

    /// Replaces the whole store with the contents of a backup file and
    /// persists it.
    ///
    /// A pending transaction snapshot is left as it is.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if `path` does not exist and `CorruptData` if
    /// it is not a valid database file.
    pub fn restore(&self, path: &Path) -> CoreResult<()> {
        let (restored, size) = backup::read_backup(path)?;
        let mut store = self.store.write();
        *store = restored;
        self.save(&store)?;
        info!(path = %path.display(), bytes = size, "restored from backup");
        Ok(())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the operation counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns per-collection document counts without sweeping.
    #[must_use]
    pub fn collection_stats(&self) -> Vec<CollectionStats> {
        let now = now_millis();
        let store = self.store.read();
        store
            .iter()
            .map(|(name, docs)| CollectionStats {
                name: name.to_string(),
                documents: docs.len(),
                expired: docs.iter().filter(|d| d.is_expired(now)).count(),
            })
            .collect()
    }

    /// Returns a deep copy of the live store without sweeping.
    #[must_use]
    pub fn snapshot(&self) -> Store {
        self.store.read().clone()
    }

    /// Returns the size of the backing file in bytes.
    pub fn file_size(&self) -> CoreResult<u64> {
        self.persistence.lock().size()
    }

    /// Describes where the database is stored.
    #[must_use]
    pub fn location(&self) -> String {
        self.persistence.lock().describe()
    }

    /// Returns database configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location())
            .field("collections", &self.store.read().collection_names().len())
            .field("transaction", &self.transaction_state())
            .finish_non_exhaustive()
    }
}
