//! Terminal operators for queries and row mutations.

use std::sync::Arc;

use tessera_common::Value;
use tracing::debug;

use super::{ColumnHeader, ExecContext, ExecResult, ExecutionResult, Operator, ResultSet, RowSource};
use crate::catalog::Table;

/// Inserts one row.
#[derive(Debug)]
pub struct InsertExec {
    table: Arc<Table>,
    values: Vec<Value>,
}

impl InsertExec {
    /// Creates an insert of `values`, one per table column.
    pub fn new(table: Arc<Table>, values: Vec<Value>) -> Self {
        Self { table, values }
    }
}

impl Operator for InsertExec {
    fn name(&self) -> &'static str {
        "Insert"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let tuple = self.table.store().insert(&self.values, &mut *ctx.txn)?;
        debug!(table = %self.table.name(), %tuple, "inserted row");
        Ok(ExecutionResult::Insert { rows_affected: 1 })
    }
}

/// Overwrites columns of every row its child produces.
#[derive(Debug)]
pub struct UpdateExec {
    table: Arc<Table>,
    child: Box<dyn RowSource>,
    columns: Vec<usize>,
    values: Vec<Value>,
}

impl UpdateExec {
    /// Creates an update; `columns` and `values` pair positionally.
    pub fn new(
        table: Arc<Table>,
        child: Box<dyn RowSource>,
        columns: Vec<usize>,
        values: Vec<Value>,
    ) -> Self {
        Self {
            table,
            child,
            columns,
            values,
        }
    }
}

impl Operator for UpdateExec {
    fn name(&self) -> &'static str {
        "Update"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let mut updated = 0u64;
        while let Some(target) = self.child.exec(ctx)? {
            self.table
                .store()
                .update(target.tuple, &self.columns, &self.values, &mut *ctx.txn)?;
            updated += 1;
        }
        debug!(table = %self.table.name(), updated, "updated rows");
        Ok(ExecutionResult::Update {
            rows_affected: updated,
        })
    }
}

/// Deletes every row its child produces.
#[derive(Debug)]
pub struct DeleteExec {
    table: Arc<Table>,
    child: Box<dyn RowSource>,
}

impl DeleteExec {
    /// Creates a delete.
    pub fn new(table: Arc<Table>, child: Box<dyn RowSource>) -> Self {
        Self { table, child }
    }
}

impl Operator for DeleteExec {
    fn name(&self) -> &'static str {
        "Delete"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let mut deleted = 0u64;
        while let Some(target) = self.child.exec(ctx)? {
            self.table.store().delete(target.tuple, &mut *ctx.txn)?;
            deleted += 1;
        }
        debug!(table = %self.table.name(), deleted, "deleted rows");
        Ok(ExecutionResult::Delete {
            rows_affected: deleted,
        })
    }
}

/// Collects and projects every row its child produces.
#[derive(Debug)]
pub struct SelectExec {
    child: Box<dyn RowSource>,
    columns: Vec<usize>,
    headers: Vec<ColumnHeader>,
}

impl SelectExec {
    /// Creates a select with output column positions and their headers.
    pub fn new(child: Box<dyn RowSource>, columns: Vec<usize>, headers: Vec<ColumnHeader>) -> Self {
        Self {
            child,
            columns,
            headers,
        }
    }
}

impl Operator for SelectExec {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let mut rows = Vec::new();
        while let Some(source) = self.child.exec(ctx)? {
            rows.push(source.row.project(&self.columns));
        }
        Ok(ExecutionResult::Query(ResultSet::new(
            self.headers.clone(),
            rows,
        )))
    }
}
