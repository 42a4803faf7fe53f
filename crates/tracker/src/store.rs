//! In-memory store of tracked operation records.
//!
//! Insertion order is preserved because that is the order the records are
//! presented to the user. Mutation is keyed by id and always a full-record
//! replacement: callers (the lifecycle controller and the poll merge)
//! compute the complete next value, the store never field-merges.
//!
//! Records leave the store only through an explicit `remove`; terminal
//! records stay visible until dismissed.

use std::sync::{Mutex, MutexGuard};

use rfops_core::Operation;

/// Store-internal misuse. Given the lifecycle contract these should not
/// occur; a caller seeing one has a sequencing bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate operation id '{id}'")]
    DuplicateId { id: String },

    #[error("no tracked operation with id '{id}'")]
    NotFound { id: String },
}

/// Process-wide collection of one kind of tracked operation.
///
/// Constructible (one per tracking context) rather than a global, so
/// tests can instantiate independent stores. Interior mutability keeps
/// `add`/`update`/`remove` callable from both the lifecycle controller
/// and the scheduler's spawned poll tasks; mutations only interleave at
/// await points, the lock is never held across one.
pub struct OperationStore<O: Operation> {
    records: Mutex<Vec<O>>,
}

impl<O: Operation> OperationStore<O> {
    pub fn new() -> Self {
        OperationStore {
            records: Mutex::new(Vec::new()),
        }
    }

    fn records(&self) -> MutexGuard<'_, Vec<O>> {
        // Recover data even if the lock was poisoned by a panicking test
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a new record. The id must not already be tracked.
    pub fn add(&self, record: O) -> Result<(), StoreError> {
        let mut records = self.records();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId {
                id: record.id().to_string(),
            });
        }
        records.push(record);
        Ok(())
    }

    /// Replace the record at `id` wholesale.
    pub fn update(&self, id: &str, record: O) -> Result<(), StoreError> {
        let mut records = self.records();
        match records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    /// Delete the record at `id`.
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records();
        match records.iter().position(|r| r.id() == id) {
            Some(index) => {
                records.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    /// Current record for `id`, if tracked.
    pub fn get(&self, id: &str) -> Option<O> {
        self.records().iter().find(|r| r.id() == id).cloned()
    }

    /// Snapshot of all records in insertion order.
    pub fn list(&self) -> Vec<O> {
        self.records().clone()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl<O: Operation> Default for OperationStore<O> {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{attack, job};
    use rfops_core::{Attack, AttackStatus, JobStatus};

    #[test]
    fn add_then_list_preserves_insertion_order() {
        let store = OperationStore::new();
        store.add(attack("a", AttackStatus::Pending)).unwrap();
        store.add(attack("b", AttackStatus::Running)).unwrap();
        store.add(attack("c", AttackStatus::Pending)).unwrap();
        let ids: Vec<_> = store.list().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let store = OperationStore::new();
        store.add(attack("a", AttackStatus::Pending)).unwrap();
        assert_eq!(
            store.add(attack("a", AttackStatus::Running)),
            Err(StoreError::DuplicateId { id: "a".into() })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_the_whole_record() {
        let store = OperationStore::new();
        store.add(attack("a", AttackStatus::Pending)).unwrap();
        let mut next = attack("a", AttackStatus::Running);
        next.progress_percent = 42.0;
        store.update("a", next.clone()).unwrap();
        assert_eq!(store.get("a"), Some(next));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store: OperationStore<Attack> = OperationStore::new();
        assert_eq!(
            store.update("ghost", attack("ghost", AttackStatus::Running)),
            Err(StoreError::NotFound { id: "ghost".into() })
        );
    }

    #[test]
    fn remove_deletes_and_keeps_order() {
        let store = OperationStore::new();
        store.add(attack("a", AttackStatus::Pending)).unwrap();
        store.add(attack("b", AttackStatus::Pending)).unwrap();
        store.add(attack("c", AttackStatus::Pending)).unwrap();
        store.remove("b").unwrap();
        let ids: Vec<_> = store.list().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(
            store.remove("b"),
            Err(StoreError::NotFound { id: "b".into() })
        );
    }

    #[test]
    fn cracking_jobs_go_through_the_same_store() {
        let store = OperationStore::new();
        store.add(job("j1", JobStatus::Queued)).unwrap();
        store.update("j1", job("j1", JobStatus::Running)).unwrap();
        assert_eq!(store.get("j1").unwrap().status, JobStatus::Running);
    }

    #[test]
    fn list_returns_a_snapshot_not_a_view() {
        let store = OperationStore::new();
        store.add(attack("a", AttackStatus::Pending)).unwrap();
        let mut snapshot = store.list();
        snapshot[0].status = AttackStatus::Failed;
        assert_eq!(store.get("a").unwrap().status, AttackStatus::Pending);
    }
}
