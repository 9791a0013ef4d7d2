//! # tessera-txn
//!
//! Single-transaction undo log for Tessera.
//!
//! A [`Transaction`] records how to reverse every storage mutation made
//! while it is active. Rollback pops the records in reverse order and
//! applies them; commit discards them.
//!
//! # Architecture
//!
//! ```text
//!   operator ──► StoreHandle::insert/delete/update ──► TableStore
//!                        │
//!                        ▼ UndoRecorder
//!                  Transaction ── undo stack ──► [Insert, Update, Delete, ...]
//!                        │
//!            rollback ◄──┴──► commit
//!      (pop + reverse, LIFO)   (drain, release deferred slots)
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use tessera_common::{ColumnDef, DataType, Value};
//! use tessera_storage::{StoreHandle, TableStore};
//! use tessera_txn::Transaction;
//!
//! let store = StoreHandle::new(
//!     TableStore::new(vec![ColumnDef::new("a", DataType::Int)], 100).unwrap(),
//! );
//! let mut txn = Transaction::new();
//!
//! txn.begin().unwrap();
//! store.insert(&[Value::Int(1)], &mut txn).unwrap();
//! txn.rollback().unwrap();
//!
//! assert_eq!(store.row_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
mod transaction;
mod undo;

pub use error::{TxnError, TxnResult};
pub use transaction::{Savepoint, Transaction, TransactionState};
pub use undo::UndoRecord;
