//! The transaction and its undo stack.

use std::fmt;

use bytes::Bytes;
use tessera_storage::{StoreHandle, TupleId, UndoRecorder};
use tracing::{debug, warn};

use crate::error::{TxnError, TxnResult};
use crate::undo::UndoRecord;

/// The state of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// No transaction is open; mutations are not recorded.
    #[default]
    Idle,
    /// A transaction is open and recording undo information.
    Active,
}

impl TransactionState {
    /// Returns true if mutations are being recorded.
    pub fn is_active(&self) -> bool {
        *self == TransactionState::Active
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::Idle => write!(f, "Idle"),
            TransactionState::Active => write!(f, "Active"),
        }
    }
}

/// A position in the undo stack that [`Transaction::rollback_to`] can
/// return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Savepoint(usize);

impl Savepoint {
    /// Returns the undo stack depth this savepoint marks.
    pub fn depth(&self) -> usize {
        self.0
    }
}

/// The single transaction of an engine.
///
/// Only one transaction can be active at a time. While active, every
/// mutation reported through [`UndoRecorder`] is pushed on the undo stack.
#[derive(Default)]
pub struct Transaction {
    /// Current state.
    state: TransactionState,
    /// Undo records in mutation order.
    undo: Vec<UndoRecord>,
}

impl Transaction {
    /// Creates an idle transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns true if a transaction is open.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Returns the number of undo records held.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens a transaction.
    pub fn begin(&mut self) -> TxnResult<()> {
        if self.is_active() {
            return Err(TxnError::AlreadyActive);
        }
        self.state = TransactionState::Active;
        debug!("transaction started");
        Ok(())
    }

    /// Commits the transaction, discarding every undo record.
    ///
    /// Returns the number of records discarded. Outside a transaction this
    /// does nothing.
    pub fn commit(&mut self) -> TxnResult<usize> {
        if !self.is_active() {
            warn!("commit without an active transaction");
            return Ok(0);
        }

        let discarded = self.undo.len();
        let mut first_error = None;
        for record in self.undo.drain(..) {
            let kind = record.kind();
            if let Err(source) = record.discard() {
                first_error.get_or_insert(TxnError::Undo { kind, source });
            }
        }
        self.state = TransactionState::Idle;
        debug!(discarded, "transaction committed");

        match first_error {
            Some(err) => Err(err),
            None => Ok(discarded),
        }
    }

    /// Rolls the transaction back, reversing every recorded mutation in
    /// reverse order.
    ///
    /// Returns the number of records applied. Outside a transaction this
    /// does nothing.
    pub fn rollback(&mut self) -> TxnResult<usize> {
        if !self.is_active() {
            warn!("rollback without an active transaction");
            return Ok(0);
        }

        let result = self.unwind(0);
        self.state = TransactionState::Idle;
        if let Ok(applied) = result {
            debug!(applied, "transaction rolled back");
        }
        result
    }

    /// Returns a savepoint at the current end of the undo stack.
    pub fn savepoint(&self) -> Savepoint {
        Savepoint(self.undo.len())
    }

    /// Reverses every mutation recorded after `savepoint`, leaving the
    /// transaction active.
    pub fn rollback_to(&mut self, savepoint: Savepoint) -> TxnResult<usize> {
        if !self.is_active() {
            return Ok(0);
        }
        if savepoint.0 > self.undo.len() {
            return Err(TxnError::InvalidSavepoint {
                savepoint: savepoint.0,
                len: self.undo.len(),
            });
        }
        let applied = self.unwind(savepoint.0)?;
        debug!(applied, depth = savepoint.0, "rolled back to savepoint");
        Ok(applied)
    }

    /// Pops and applies records until `depth` remain. Every record is
    /// attempted; the first failure is reported.
    fn unwind(&mut self, depth: usize) -> TxnResult<usize> {
        let mut applied = 0;
        let mut first_error = None;
        while self.undo.len() > depth {
            let Some(record) = self.undo.pop() else {
                break;
            };
            let kind = record.kind();
            let tuple = record.tuple();
            match record.apply() {
                Ok(()) => {
                    debug!(kind, %tuple, "applied undo record");
                    applied += 1;
                }
                Err(source) => {
                    first_error.get_or_insert(TxnError::Undo { kind, source });
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    // =========================================================================
    // Undo Logging
    // =========================================================================

    /// Records that `tuple` was inserted. Ignored when idle.
    pub fn add_insert_undo(&mut self, store: &StoreHandle, tuple: TupleId) {
        self.push(UndoRecord::Insert {
            store: store.clone(),
            tuple,
        });
    }

    /// Records that `tuple` is being deleted. Ignored when idle.
    pub fn add_delete_undo(&mut self, store: &StoreHandle, tuple: TupleId) {
        self.push(UndoRecord::Delete {
            store: store.clone(),
            tuple,
        });
    }

    /// Records the bytes of `tuple` before an update. Ignored when idle.
    pub fn add_update_undo(&mut self, store: &StoreHandle, tuple: TupleId, before: Bytes) {
        self.push(UndoRecord::Update {
            store: store.clone(),
            tuple,
            before,
        });
    }

    fn push(&mut self, record: UndoRecord) {
        if self.is_active() {
            self.undo.push(record);
        }
    }
}

impl UndoRecorder for Transaction {
    fn is_recording(&self) -> bool {
        self.is_active()
    }

    fn record_insert(&mut self, store: &StoreHandle, tuple: TupleId) {
        self.add_insert_undo(store, tuple);
    }

    fn record_delete(&mut self, store: &StoreHandle, tuple: TupleId) {
        self.add_delete_undo(store, tuple);
    }

    fn record_update(&mut self, store: &StoreHandle, tuple: TupleId, before: Bytes) {
        self.add_update_undo(store, tuple, before);
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("state", &self.state)
            .field("undo_len", &self.undo.len())
            .finish()
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.is_active() && !self.undo.is_empty() {
            warn!(
                pending = self.undo.len(),
                "transaction dropped while active; changes are kept"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::{ColumnDef, DataType, Row, Value};
    use tessera_storage::TableStore;

    fn create_store(group_size: usize) -> StoreHandle {
        StoreHandle::new(
            TableStore::new(
                vec![
                    ColumnDef::new("a", DataType::Int),
                    ColumnDef::new("b", DataType::Varchar(5)),
                ],
                group_size,
            )
            .unwrap(),
        )
    }

    fn rows(store: &StoreHandle) -> Vec<Row> {
        store.lock().rows().unwrap()
    }

    fn values(a: i32, b: &str) -> [Value; 2] {
        [Value::Int(a), Value::from(b)]
    }

    #[test]
    fn test_transaction_lifecycle() {
        let mut txn = Transaction::new();
        assert_eq!(txn.state(), TransactionState::Idle);

        txn.begin().unwrap();
        assert!(txn.is_active());
        assert!(matches!(txn.begin(), Err(TxnError::AlreadyActive)));

        assert_eq!(txn.commit().unwrap(), 0);
        assert_eq!(txn.state(), TransactionState::Idle);
    }

    #[test]
    fn test_idle_mutations_are_not_logged() {
        let store = create_store(4);
        let mut txn = Transaction::new();
        store.insert(&values(1, "a"), &mut txn).unwrap();
        assert_eq!(txn.undo_len(), 0);
        assert_eq!(txn.rollback().unwrap(), 0);
        assert_eq!(store.row_count(), 1);
    }

    #[test]
    fn test_rollback_insert() {
        let store = create_store(4);
        store.insert(&values(1, "keep"), &mut Transaction::new()).unwrap();
        let before = rows(&store);

        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.insert(&values(2, "drop"), &mut txn).unwrap();
        assert_eq!(store.row_count(), 2);

        assert_eq!(txn.rollback().unwrap(), 1);
        assert_eq!(rows(&store), before);
        assert!(!txn.is_active());
    }

    #[test]
    fn test_rollback_delete() {
        let store = create_store(4);
        let mut idle = Transaction::new();
        store.insert(&values(1, "x"), &mut idle).unwrap();
        let target = store.insert(&values(2, "y"), &mut idle).unwrap();

        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.delete(target, &mut txn).unwrap();
        assert_eq!(store.row_count(), 1);

        txn.rollback().unwrap();
        assert_eq!(store.row_count(), 2);
        assert_eq!(store.decode(target).unwrap().values(), &values(2, "y"));
    }

    #[test]
    fn test_rollback_update() {
        let store = create_store(4);
        let tuple = store.insert(&values(1, "old"), &mut Transaction::new()).unwrap();
        let before = store.lock().snapshot(tuple).unwrap();

        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store
            .update(tuple, &[0, 1], &[Value::Int(9), Value::from("new")], &mut txn)
            .unwrap();
        store
            .update(tuple, &[1], &[Value::Null], &mut txn)
            .unwrap();

        txn.rollback().unwrap();
        assert_eq!(store.lock().snapshot(tuple).unwrap(), before);
    }

    #[test]
    fn test_delete_then_insert_does_not_clobber_deleted_row() {
        let store = create_store(1);
        let victim = store.insert(&values(1, "orig"), &mut Transaction::new()).unwrap();

        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.delete(victim, &mut txn).unwrap();
        let fresh = store.insert(&values(2, "fresh"), &mut txn).unwrap();
        assert_ne!(fresh, victim);

        txn.rollback().unwrap();
        assert_eq!(rows(&store), vec![Row::new(values(1, "orig").to_vec())]);
    }

    #[test]
    fn test_commit_releases_deleted_slots() {
        let store = create_store(1);
        let victim = store.insert(&values(1, "a"), &mut Transaction::new()).unwrap();

        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.delete(victim, &mut txn).unwrap();
        assert_eq!(txn.commit().unwrap(), 1);

        let reused = store.insert(&values(2, "b"), &mut txn).unwrap();
        assert_eq!(reused, victim);
        assert_eq!(store.lock().group_count(), 1);
    }

    #[test]
    fn test_commit_clears_log() {
        let store = create_store(4);
        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.insert(&values(1, "a"), &mut txn).unwrap();
        let tuple = store.insert(&values(2, "b"), &mut txn).unwrap();
        store.update(tuple, &[1], &[Value::from("c")], &mut txn).unwrap();
        assert_eq!(txn.undo_len(), 3);

        txn.commit().unwrap();
        assert_eq!(txn.undo_len(), 0);
        let after_commit = rows(&store);

        assert_eq!(txn.rollback().unwrap(), 0);
        assert_eq!(rows(&store), after_commit);
    }

    #[test]
    fn test_mixed_rollback_restores_everything() {
        let store = create_store(2);
        let mut idle = Transaction::new();
        let a = store.insert(&values(1, "a"), &mut idle).unwrap();
        let b = store.insert(&values(2, "b"), &mut idle).unwrap();
        let before = rows(&store);

        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.update(a, &[1], &[Value::from("aa")], &mut txn).unwrap();
        store.delete(a, &mut txn).unwrap();
        store.insert(&values(3, "c"), &mut txn).unwrap();
        store.update(b, &[0], &[Value::Int(20)], &mut txn).unwrap();
        store.delete(b, &mut txn).unwrap();
        assert_eq!(store.row_count(), 1);

        assert_eq!(txn.rollback().unwrap(), 5);
        let mut after = rows(&store);
        let mut expected = before;
        after.sort_by(|x, y| x.values().cmp(y.values()));
        expected.sort_by(|x, y| x.values().cmp(y.values()));
        assert_eq!(after, expected);
    }

    #[test]
    fn test_rollback_to_savepoint() {
        let store = create_store(4);
        let mut txn = Transaction::new();
        txn.begin().unwrap();
        store.insert(&values(1, "kept"), &mut txn).unwrap();

        let savepoint = txn.savepoint();
        store.insert(&values(2, "gone"), &mut txn).unwrap();
        store.insert(&values(3, "gone"), &mut txn).unwrap();

        assert_eq!(txn.rollback_to(savepoint).unwrap(), 2);
        assert!(txn.is_active());
        assert_eq!(txn.undo_len(), 1);
        assert_eq!(rows(&store), vec![Row::new(values(1, "kept").to_vec())]);

        txn.rollback().unwrap();
        assert_eq!(store.row_count(), 0);
    }

    #[test]
    fn test_invalid_savepoint() {
        let mut txn = Transaction::new();
        txn.begin().unwrap();
        let err = txn.rollback_to(Savepoint(3)).unwrap_err();
        assert!(matches!(err, TxnError::InvalidSavepoint { savepoint: 3, len: 0 }));
    }

    #[test]
    fn test_store_outlives_table_handle() {
        let mut txn = Transaction::new();
        txn.begin().unwrap();
        {
            let store = create_store(4);
            store.insert(&values(1, "x"), &mut txn).unwrap();
        }
        assert_eq!(txn.undo_len(), 1);
        assert_eq!(txn.rollback().unwrap(), 1);
    }
}
