//! # tessera-storage
//!
//! Fixed-slot tuple storage for Tessera tables.
//!
//! Every table owns one [`TableStore`]. A store packs rows into fixed-size
//! binary tuples whose layout is computed once from the column list:
//!
//! ```text
//! ┌──────────────────────┬──────────┬──────────┬─────┬──────────┐
//! │ null map (1 B / col) │ column 0 │ column 1 │ ... │ column n │
//! └──────────────────────┴──────────┴──────────┴─────┴──────────┘
//!                          INT = 4 B, LONG = 8 B, CHAR(n)/VARCHAR(n) = n + 1 B
//! ```
//!
//! Tuples live in slots allocated in groups. Each slot is linked into exactly
//! one of two doubly linked lists, the free list or the data list, through
//! index tables kept beside the slot bytes:
//!
//! ```text
//!   FREE_HEAD ⇄ slot ⇄ slot ⇄ ... ⇄ FREE_TAIL
//!   DATA_HEAD ⇄ slot ⇄ slot ⇄ ... ⇄ DATA_TAIL     (newest row first)
//! ```
//!
//! Mutations that a transaction may have to reverse go through
//! [`StoreHandle`], which reports them to an [`UndoRecorder`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arena;
mod codec;
pub mod error;
mod handle;
pub mod layout;
mod table;

pub use arena::TupleId;
pub use error::{StorageError, StorageResult};
pub use handle::{NoUndo, StoreHandle, UndoRecorder};
pub use layout::TupleLayout;
pub use table::{SlotRelease, TableStore};
