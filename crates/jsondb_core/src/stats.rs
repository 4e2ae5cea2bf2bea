//! Database statistics.
//!
//! Operation counters are atomic and can be read at any time. Reading
//! them never sweeps or persists.
//!
//! ```rust,ignore
//! let db = Database::open_in_memory()?;
//! db.insert("users", Document::new(1))?;
//!
//! let stats = db.stats();
//! println!("Inserts: {}", stats.inserts);
//! println!("Saves: {}", stats.saves);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live operation counters.
#[derive(Debug, Default)]
pub struct DatabaseStats {
    inserts: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    sweeps: AtomicU64,
    documents_swept: AtomicU64,
    saves: AtomicU64,
    bytes_written: AtomicU64,
    transactions_started: AtomicU64,
    transactions_committed: AtomicU64,
    transactions_rolled_back: AtomicU64,
}

impl DatabaseStats {
    /// Creates a zeroed stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self, removed: usize) {
        self.deletes.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.documents_swept
            .fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_save(&self, bytes: usize) {
        self.saves.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_start(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_commit(&self) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_rollback(&self) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            documents_swept: self.documents_swept.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            transactions_started: self.transactions_started.load(Ordering::Relaxed),
            transactions_committed: self.transactions_committed.load(Ordering::Relaxed),
            transactions_rolled_back: self.transactions_rolled_back.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DatabaseStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Successful inserts.
    pub inserts: u64,
    /// Successful updates.
    pub updates: u64,
    /// Documents removed by `delete`.
    pub deletes: u64,
    /// Expiry sweeps run.
    pub sweeps: u64,
    /// Documents removed by sweeps.
    pub documents_swept: u64,
    /// Full-file saves.
    pub saves: u64,
    /// Bytes written by saves.
    pub bytes_written: u64,
    /// Transactions started.
    pub transactions_started: u64,
    /// Transactions committed.
    pub transactions_committed: u64,
    /// Transactions rolled back.
    pub transactions_rolled_back: u64,
}

/// Document counts for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// Documents present, expired or not.
    pub documents: usize,
    /// Documents present but already expired (removed by the next read).
    pub expired: usize,
}
