//! Shared store handle and the undo recording seam.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};
use tessera_common::{Row, Value};

use crate::arena::TupleId;
use crate::error::StorageResult;
use crate::table::{SlotRelease, TableStore};

/// Receives a description of every mutation made through a [`StoreHandle`].
///
/// Implemented by the transaction's undo log. When `is_recording` returns
/// false no record is produced and no snapshot is taken.
pub trait UndoRecorder {
    /// Returns true if mutations should be recorded.
    fn is_recording(&self) -> bool;

    /// A tuple was inserted.
    fn record_insert(&mut self, store: &StoreHandle, tuple: TupleId);

    /// A tuple is about to be deleted. Its slot is retained until the
    /// record is discarded.
    fn record_delete(&mut self, store: &StoreHandle, tuple: TupleId);

    /// A tuple is about to be updated; `before` holds its current bytes.
    fn record_update(&mut self, store: &StoreHandle, tuple: TupleId, before: Bytes);
}

/// Recorder for mutations that are never reversed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoUndo;

impl UndoRecorder for NoUndo {
    fn is_recording(&self) -> bool {
        false
    }

    fn record_insert(&mut self, _store: &StoreHandle, _tuple: TupleId) {}

    fn record_delete(&mut self, _store: &StoreHandle, _tuple: TupleId) {}

    fn record_update(&mut self, _store: &StoreHandle, _tuple: TupleId, _before: Bytes) {}
}

/// Reference-counted handle to a table store.
///
/// The table owns one handle; undo records hold clones so a store outlives
/// a dropped table until the transaction finishes with it.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<TableStore>>,
}

impl StoreHandle {
    /// Wraps a store.
    pub fn new(store: TableStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Locks the store for direct access.
    pub fn lock(&self) -> MutexGuard<'_, TableStore> {
        self.inner.lock()
    }

    /// Returns true if both handles refer to the same store.
    pub fn ptr_eq(&self, other: &StoreHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Logged Mutations
    // =========================================================================

    /// Inserts a row and records an insert undo.
    pub fn insert(&self, values: &[Value], undo: &mut dyn UndoRecorder) -> StorageResult<TupleId> {
        let mut store = self.inner.lock();
        let tuple = store.insert(values)?;
        if undo.is_recording() {
            undo.record_insert(self, tuple);
        }
        Ok(tuple)
    }

    /// Records a delete undo, then deletes the tuple.
    pub fn delete(&self, tuple: TupleId, undo: &mut dyn UndoRecorder) -> StorageResult<()> {
        let mut store = self.inner.lock();
        store.ensure_live(tuple)?;
        let release = if undo.is_recording() {
            undo.record_delete(self, tuple);
            SlotRelease::Deferred
        } else {
            SlotRelease::Immediate
        };
        store.delete(tuple, release)
    }

    /// Records an update undo holding the tuple's current bytes, then
    /// overwrites the given columns.
    pub fn update(
        &self,
        tuple: TupleId,
        columns: &[usize],
        values: &[Value],
        undo: &mut dyn UndoRecorder,
    ) -> StorageResult<()> {
        let mut store = self.inner.lock();
        store.ensure_live(tuple)?;
        store.layout().validate_assignments(columns, values)?;
        if undo.is_recording() {
            let before = store.snapshot(tuple)?;
            undo.record_update(self, tuple, before);
        }
        store.update(tuple, columns, values)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// See [`TableStore::scan_next`].
    pub fn scan_next(&self, previous: Option<TupleId>) -> StorageResult<Option<TupleId>> {
        self.inner.lock().scan_next(previous)
    }

    /// See [`TableStore::decode`].
    pub fn decode(&self, tuple: TupleId) -> StorageResult<Row> {
        self.inner.lock().decode(tuple)
    }

    /// Returns the number of live rows.
    pub fn row_count(&self) -> usize {
        self.inner.lock().row_count()
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(store) => f
                .debug_struct("StoreHandle")
                .field("rows", &store.row_count())
                .field("groups", &store.group_count())
                .finish(),
            None => f.debug_struct("StoreHandle").finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::{ColumnDef, DataType};

    #[derive(Default)]
    struct Recorded {
        inserts: Vec<TupleId>,
        deletes: Vec<TupleId>,
        updates: Vec<(TupleId, Bytes)>,
    }

    impl UndoRecorder for Recorded {
        fn is_recording(&self) -> bool {
            true
        }

        fn record_insert(&mut self, _store: &StoreHandle, tuple: TupleId) {
            self.inserts.push(tuple);
        }

        fn record_delete(&mut self, _store: &StoreHandle, tuple: TupleId) {
            self.deletes.push(tuple);
        }

        fn record_update(&mut self, _store: &StoreHandle, tuple: TupleId, before: Bytes) {
            self.updates.push((tuple, before));
        }
    }

    fn handle() -> StoreHandle {
        let store = TableStore::new(
            vec![
                ColumnDef::new("id", DataType::Int),
                ColumnDef::new("name", DataType::Varchar(4)),
            ],
            8,
        )
        .unwrap();
        StoreHandle::new(store)
    }

    #[test]
    fn test_logged_mutations_are_recorded() {
        let store = handle();
        let mut undo = Recorded::default();

        let tuple = store
            .insert(&[Value::Int(1), Value::from("ab")], &mut undo)
            .unwrap();
        let before = store.lock().snapshot(tuple).unwrap();
        store
            .update(tuple, &[1], &[Value::from("cd")], &mut undo)
            .unwrap();
        store.delete(tuple, &mut undo).unwrap();

        assert_eq!(undo.inserts, vec![tuple]);
        assert_eq!(undo.updates, vec![(tuple, before)]);
        assert_eq!(undo.deletes, vec![tuple]);
        assert_eq!(store.row_count(), 0);
    }

    #[test]
    fn test_failed_update_records_nothing() {
        let store = handle();
        let mut undo = Recorded::default();
        let tuple = store
            .insert(&[Value::Int(1), Value::from("ab")], &mut undo)
            .unwrap();

        assert!(store
            .update(tuple, &[1], &[Value::from("abcde")], &mut undo)
            .is_err());
        assert!(undo.updates.is_empty());
    }

    #[test]
    fn test_unrecorded_delete_frees_slot() {
        let store = handle();
        let tuple = store
            .insert(&[Value::Int(1), Value::Null], &mut NoUndo)
            .unwrap();
        store.delete(tuple, &mut NoUndo).unwrap();
        let reused = store
            .insert(&[Value::Int(2), Value::Null], &mut NoUndo)
            .unwrap();
        assert_eq!(reused, tuple);
    }

    #[test]
    fn test_clones_share_store() {
        let a = handle();
        let b = a.clone();
        a.insert(&[Value::Int(1), Value::Null], &mut NoUndo).unwrap();
        assert_eq!(b.row_count(), 1);
        assert!(a.ptr_eq(&b));
    }
}
