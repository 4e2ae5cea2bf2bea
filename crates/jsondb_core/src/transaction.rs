//! Snapshot transactions.
//!
//! A transaction is a rollback target, not an isolation boundary:
//! - `start` captures a deep copy of the whole store
//! - mutations made afterwards go straight to the live store (and disk)
//! - `rollback` puts the captured copy back
//! - `commit` drops the copy
//!
//! At most one snapshot is pending. Starting again while pending replaces
//! the previous snapshot; there is no nesting.

use crate::store::Store;
use parking_lot::Mutex;

/// State of the transaction manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No snapshot is held.
    Idle,
    /// A snapshot is held as a rollback target.
    Pending,
}

/// Holds the pending snapshot, if any.
#[derive(Debug, Default)]
pub struct TransactionManager {
    snapshot: Mutex<Option<Store>>,
}

impl TransactionManager {
    /// Creates an idle transaction manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures `store` as the rollback target.
    ///
    /// Returns `true` if a pending snapshot was replaced.
    pub fn start(&self, store: &Store) -> bool {
        self.snapshot.lock().replace(store.clone()).is_some()
    }

    /// Removes and returns the pending snapshot.
    pub fn take(&self) -> Option<Store> {
        self.snapshot.lock().take()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        if self.snapshot.lock().is_some() {
            TransactionState::Pending
        } else {
            TransactionState::Idle
        }
    }

    /// Returns whether a snapshot is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == TransactionState::Pending
    }
}
