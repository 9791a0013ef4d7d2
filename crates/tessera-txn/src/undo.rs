//! Undo records.

use bytes::Bytes;
use tessera_storage::{StorageResult, StoreHandle, TupleId};

/// How to reverse one storage mutation.
///
/// Every record holds a handle to the store it touched, so the store stays
/// alive while the record does.
#[derive(Debug, Clone)]
pub enum UndoRecord {
    /// A tuple was inserted; reversed by removing it.
    Insert {
        /// Owning store.
        store: StoreHandle,
        /// Inserted tuple.
        tuple: TupleId,
    },
    /// A tuple was deleted; reversed by relinking it. Its slot is held back
    /// from reuse until the record is discarded.
    Delete {
        /// Owning store.
        store: StoreHandle,
        /// Deleted tuple.
        tuple: TupleId,
    },
    /// A tuple was updated; reversed by restoring its previous bytes.
    Update {
        /// Owning store.
        store: StoreHandle,
        /// Updated tuple.
        tuple: TupleId,
        /// Tuple bytes before the update.
        before: Bytes,
    },
}

impl UndoRecord {
    /// Returns the record kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            UndoRecord::Insert { .. } => "insert",
            UndoRecord::Delete { .. } => "delete",
            UndoRecord::Update { .. } => "update",
        }
    }

    /// Returns the affected tuple.
    pub fn tuple(&self) -> TupleId {
        match self {
            UndoRecord::Insert { tuple, .. }
            | UndoRecord::Delete { tuple, .. }
            | UndoRecord::Update { tuple, .. } => *tuple,
        }
    }

    /// Reverses the mutation.
    pub(crate) fn apply(self) -> StorageResult<()> {
        match self {
            UndoRecord::Insert { store, tuple } => store.lock().remove(tuple),
            UndoRecord::Delete { store, tuple } => store.lock().relink(tuple),
            UndoRecord::Update {
                store,
                tuple,
                before,
            } => store.lock().restore(tuple, &before),
        }
    }

    /// Drops the record after a commit.
    pub(crate) fn discard(self) -> StorageResult<()> {
        match self {
            UndoRecord::Delete { store, tuple } => store.lock().release(tuple),
            UndoRecord::Insert { .. } | UndoRecord::Update { .. } => Ok(()),
        }
    }
}
