//! Pull-based execution.
//!
//! [`QueryExecutor`] turns a plan chain into an operator chain of the same
//! shape: the head becomes a terminal [`Operator`], every node below it a
//! [`RowSource`] that pulls from the one beneath.

mod ddl;
mod dml;
mod engine;
mod error;
mod operators;
mod result;

pub use ddl::{CreateIndexExec, CreateTableExec, DropExec, ShowExec, TransactionExec};
pub use dml::{DeleteExec, InsertExec, SelectExec, UpdateExec};
pub use engine::{ExecContext, QueryExecutor};
pub use error::{ExecResult, ExecutionError};
pub use operators::{FilterExec, LimitExec, Operator, RowSource, SeqScanExec, SortExec, TupleRow};
pub use result::{ColumnHeader, ExecutionResult, ResultSet};
