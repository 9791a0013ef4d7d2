//! Per-table tuple store.
//!
//! `TableStore` owns a table's slots and encodes rows into them. It performs
//! no undo logging itself; see [`StoreHandle`](crate::StoreHandle).

use bytes::Bytes;
use tessera_common::{ColumnDef, Row, Value};

use crate::arena::{SlotArena, SlotState, TupleId};
use crate::codec::{decode_column, encode_column};
use crate::error::{StorageError, StorageResult};
use crate::layout::TupleLayout;

/// What happens to a deleted tuple's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRelease {
    /// The slot is reusable by the next insert.
    Immediate,
    /// The slot keeps its bytes until [`TableStore::release`] or
    /// [`TableStore::relink`] is called for it.
    Deferred,
}

/// Fixed-slot storage for one table.
#[derive(Debug)]
pub struct TableStore {
    layout: TupleLayout,
    arena: SlotArena,
    live_rows: usize,
}

impl TableStore {
    /// Creates an empty store for the given columns.
    ///
    /// No memory is allocated until the first insert.
    pub fn new(columns: Vec<ColumnDef>, group_size: usize) -> StorageResult<Self> {
        if group_size == 0 {
            return Err(StorageError::InvalidLayout(
                "tuple group size must be at least 1".to_string(),
            ));
        }
        let layout = TupleLayout::new(columns)?;
        let arena = SlotArena::new(layout.tuple_size(), group_size);
        Ok(Self {
            layout,
            arena,
            live_rows: 0,
        })
    }

    /// Returns the tuple layout.
    pub fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    /// Returns the column definitions.
    pub fn columns(&self) -> &[ColumnDef] {
        self.layout.columns()
    }

    /// Returns the fixed tuple size in bytes.
    pub fn tuple_size(&self) -> usize {
        self.layout.tuple_size()
    }

    /// Returns the number of live rows.
    pub fn row_count(&self) -> usize {
        self.live_rows
    }

    /// Returns true if the store has no live rows.
    pub fn is_empty(&self) -> bool {
        self.live_rows == 0
    }

    /// Returns the number of tuple groups allocated so far.
    pub fn group_count(&self) -> usize {
        self.arena.group_count()
    }

    /// Returns the number of slots in the free list, retained ones included.
    pub fn free_count(&self) -> usize {
        self.arena.free_len()
    }

    /// Returns the total number of slots allocated.
    pub fn slot_count(&self) -> usize {
        self.arena.slot_count()
    }

    /// Returns true if `tuple` is currently in the data list.
    pub fn is_live(&self, tuple: TupleId) -> bool {
        self.arena.state(tuple) == Some(SlotState::Live)
    }

    /// Returns an error unless `tuple` is currently in the data list.
    pub fn ensure_live(&self, tuple: TupleId) -> StorageResult<()> {
        self.arena
            .expect_state(tuple, &[SlotState::Live], "a live tuple")
            .map(|_| ())
    }

    // =========================================================================
    // Row Operations
    // =========================================================================

    /// Inserts a row and returns its tuple id.
    ///
    /// All values are validated before any slot is taken, so a failed insert
    /// leaves the store untouched.
    pub fn insert(&mut self, values: &[Value]) -> StorageResult<TupleId> {
        self.layout.validate_row(values)?;

        let tuple = self.arena.pop_free()?;
        let layout = &self.layout;
        let body = self.arena.body_mut(tuple);
        body[..layout.null_map_len()].fill(0);
        for (index, value) in values.iter().enumerate() {
            write_column(layout, body, index, value);
        }

        self.arena.push_live(tuple, false);
        self.live_rows += 1;
        Ok(tuple)
    }

    /// Deletes a live tuple by moving its slot to the free list.
    pub fn delete(&mut self, tuple: TupleId, release: SlotRelease) -> StorageResult<()> {
        self.ensure_live(tuple)?;
        self.arena
            .release_live(tuple, release == SlotRelease::Deferred);
        self.live_rows -= 1;
        Ok(())
    }

    /// Overwrites the given columns of a live tuple in place.
    ///
    /// Columns not named are left byte-for-byte unchanged, and the tuple
    /// keeps its position in the data list.
    pub fn update(&mut self, tuple: TupleId, columns: &[usize], values: &[Value]) -> StorageResult<()> {
        self.ensure_live(tuple)?;
        self.layout.validate_assignments(columns, values)?;

        let layout = &self.layout;
        let body = self.arena.body_mut(tuple);
        for (&index, value) in columns.iter().zip(values) {
            write_column(layout, body, index, value);
        }
        Ok(())
    }

    // =========================================================================
    // Scan and Decode
    // =========================================================================

    /// Returns the tuple after `previous` in the data list.
    ///
    /// With `None` this is the most recently inserted tuple. Returns `None`
    /// once the end of the list is reached.
    pub fn scan_next(&self, previous: Option<TupleId>) -> StorageResult<Option<TupleId>> {
        match previous {
            None => Ok(self.arena.first_live()),
            Some(tuple) => {
                self.ensure_live(tuple)?;
                Ok(self.arena.next_live(tuple))
            }
        }
    }

    /// Decodes a live tuple into a row in column order.
    pub fn decode(&self, tuple: TupleId) -> StorageResult<Row> {
        self.ensure_live(tuple)?;
        let body = self.arena.body(tuple);
        let values = self
            .layout
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let flag = body[self.layout.null_flag_offset(index)];
                let range = self.layout.column_range(index);
                decode_column(tuple, column.data_type, flag, &body[range])
            })
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(Row::new(values))
    }

    /// Collects every live row, newest first.
    pub fn rows(&self) -> StorageResult<Vec<Row>> {
        let mut rows = Vec::with_capacity(self.live_rows);
        let mut cursor = self.scan_next(None)?;
        while let Some(tuple) = cursor {
            rows.push(self.decode(tuple)?);
            cursor = self.scan_next(Some(tuple))?;
        }
        Ok(rows)
    }

    // =========================================================================
    // Undo Primitives
    // =========================================================================

    /// Copies the current bytes of a live tuple.
    pub fn snapshot(&self, tuple: TupleId) -> StorageResult<Bytes> {
        self.ensure_live(tuple)?;
        Ok(Bytes::copy_from_slice(self.arena.body(tuple)))
    }

    /// Reverses an insert: the tuple leaves the data list and its slot is
    /// immediately reusable.
    pub fn remove(&mut self, tuple: TupleId) -> StorageResult<()> {
        self.delete(tuple, SlotRelease::Immediate)
    }

    /// Reverses a delete: the slot moves back to the data list head with
    /// the bytes it had when it was deleted.
    pub fn relink(&mut self, tuple: TupleId) -> StorageResult<()> {
        self.arena.expect_state(
            tuple,
            &[SlotState::Retained, SlotState::Free],
            "a deleted tuple",
        )?;
        self.arena.push_live(tuple, true);
        self.live_rows += 1;
        Ok(())
    }

    /// Reverses an update by overwriting the tuple with a snapshot.
    pub fn restore(&mut self, tuple: TupleId, snapshot: &[u8]) -> StorageResult<()> {
        self.ensure_live(tuple)?;
        if snapshot.len() != self.tuple_size() {
            return Err(StorageError::Corrupted {
                tuple,
                reason: format!(
                    "snapshot of {} bytes does not match tuple size {}",
                    snapshot.len(),
                    self.tuple_size()
                ),
            });
        }
        self.arena.body_mut(tuple).copy_from_slice(snapshot);
        Ok(())
    }

    /// Makes a slot deleted with [`SlotRelease::Deferred`] reusable.
    pub fn release(&mut self, tuple: TupleId) -> StorageResult<()> {
        self.arena
            .expect_state(tuple, &[SlotState::Retained], "a retained tuple")?;
        self.arena.unretain(tuple);
        Ok(())
    }
}

fn write_column(layout: &TupleLayout, body: &mut [u8], index: usize, value: &Value) {
    let data_type = layout.columns()[index].data_type;
    let range = layout.column_range(index);
    let (null_map, data) = body.split_at_mut(layout.null_map_len());
    let start = range.start - null_map.len();
    let end = range.end - null_map.len();
    encode_column(
        data_type,
        value,
        &mut null_map[layout.null_flag_offset(index)],
        &mut data[start..end],
    );
}
