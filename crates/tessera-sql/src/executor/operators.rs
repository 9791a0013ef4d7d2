//! Row-producing operators.
//!
//! Operators form a pull chain: each call to [`RowSource::exec`] yields at
//! most one row, pulling from the child only as far as it needs to.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tessera_common::{Row, Value};
use tessera_storage::TupleId;

use super::{ExecContext, ExecResult, ExecutionResult};
use crate::catalog::Table;
use crate::planner::SortKey;

/// A decoded row together with the slot it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleRow {
    /// Source slot.
    pub tuple: TupleId,
    /// Decoded values, one per table column.
    pub row: Row,
}

/// An operator that produces rows one at a time.
pub trait RowSource: fmt::Debug {
    /// Returns the operator name.
    fn name(&self) -> &'static str;

    /// Returns the next row, or `None` once exhausted.
    fn exec(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<Option<TupleRow>>;
}

/// A terminal operator that runs once and reports a result.
pub trait Operator: fmt::Debug {
    /// Returns the operator name.
    fn name(&self) -> &'static str;

    /// Runs the operator to completion.
    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult>;
}

// =============================================================================
// SeqScan
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanCursor {
    NotStarted,
    Next(TupleId),
    Done,
}

/// Sequential scan over a table's data list, newest row first.
#[derive(Debug)]
pub struct SeqScanExec {
    table: Arc<Table>,
    cursor: ScanCursor,
}

impl SeqScanExec {
    /// Creates a scan positioned before the first row.
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            cursor: ScanCursor::NotStarted,
        }
    }
}

impl RowSource for SeqScanExec {
    fn name(&self) -> &'static str {
        "SeqScan"
    }

    fn exec(&mut self, _ctx: &mut ExecContext<'_>) -> ExecResult<Option<TupleRow>> {
        let store = self.table.store().lock();
        let current = match self.cursor {
            ScanCursor::NotStarted => store.scan_next(None)?,
            ScanCursor::Next(tuple) => Some(tuple),
            ScanCursor::Done => None,
        };
        let Some(tuple) = current else {
            self.cursor = ScanCursor::Done;
            return Ok(None);
        };

        let row = store.decode(tuple)?;
        // The successor is taken now so the caller may delete `tuple`.
        self.cursor = match store.scan_next(Some(tuple))? {
            Some(next) => ScanCursor::Next(next),
            None => ScanCursor::Done,
        };
        Ok(Some(TupleRow { tuple, row }))
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Passes through rows whose column equals a value.
///
/// NULL on either side never matches; neither does a string compared with
/// an integer.
#[derive(Debug)]
pub struct FilterExec {
    child: Box<dyn RowSource>,
    column: usize,
    value: Value,
}

impl FilterExec {
    /// Creates a filter on `row[column] = value`.
    pub fn new(child: Box<dyn RowSource>, column: usize, value: Value) -> Self {
        Self {
            child,
            column,
            value,
        }
    }

    fn matches(&self, row: &Row) -> bool {
        match row.get(self.column) {
            Some(cell) => !cell.is_null() && !self.value.is_null() && *cell == self.value,
            None => false,
        }
    }
}

impl RowSource for FilterExec {
    fn name(&self) -> &'static str {
        "Filter"
    }

    fn exec(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<Option<TupleRow>> {
        while let Some(candidate) = self.child.exec(ctx)? {
            if self.matches(&candidate.row) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

// =============================================================================
// Sort
// =============================================================================

/// Drains its child, then yields the rows ordered by the sort keys.
#[derive(Debug)]
pub struct SortExec {
    child: Box<dyn RowSource>,
    keys: Vec<SortKey>,
    sorted: Option<std::vec::IntoIter<TupleRow>>,
}

impl SortExec {
    /// Creates a sort operator.
    pub fn new(child: Box<dyn RowSource>, keys: Vec<SortKey>) -> Self {
        Self {
            child,
            keys,
            sorted: None,
        }
    }

    fn compare(keys: &[SortKey], a: &Row, b: &Row) -> Ordering {
        for key in keys {
            let ordering = match (a.get(key.column), b.get(key.column)) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => Ordering::Equal,
            };
            let ordering = if key.asc { ordering } else { ordering.reverse() };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl RowSource for SortExec {
    fn name(&self) -> &'static str {
        "Sort"
    }

    fn exec(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<Option<TupleRow>> {
        if self.sorted.is_none() {
            let mut rows = Vec::new();
            while let Some(row) = self.child.exec(ctx)? {
                rows.push(row);
            }
            let keys = &self.keys;
            rows.sort_by(|a, b| Self::compare(keys, &a.row, &b.row));
            self.sorted = Some(rows.into_iter());
        }
        Ok(self.sorted.as_mut().and_then(Iterator::next))
    }
}

// =============================================================================
// Limit
// =============================================================================

/// Skips `offset` rows, then yields at most `limit` rows.
#[derive(Debug)]
pub struct LimitExec {
    child: Box<dyn RowSource>,
    limit: Option<u64>,
    offset: u64,
    skipped: u64,
    emitted: u64,
}

impl LimitExec {
    /// Creates a limit operator.
    pub fn new(child: Box<dyn RowSource>, limit: Option<u64>, offset: u64) -> Self {
        Self {
            child,
            limit,
            offset,
            skipped: 0,
            emitted: 0,
        }
    }
}

impl RowSource for LimitExec {
    fn name(&self) -> &'static str {
        "Limit"
    }

    fn exec(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<Option<TupleRow>> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return Ok(None);
        }
        while self.skipped < self.offset {
            if self.child.exec(ctx)?.is_none() {
                return Ok(None);
            }
            self.skipped += 1;
        }
        let row = self.child.exec(ctx)?;
        if row.is_some() {
            self.emitted += 1;
        }
        Ok(row)
    }
}
