//! Statement trees accepted by the planner.
//!
//! Statements arrive already parsed and validated; this module only defines
//! their shape. Builder helpers make them convenient to construct by hand.

mod expr;
mod statement;

pub use expr::{BinaryOperator, Expr, Literal};
pub use statement::{
    Assignment, CreateIndexStatement, CreateTableStatement, DeleteStatement, DropStatement,
    DropTarget, InsertStatement, OrderByExpr, SelectItem, SelectStatement, ShowStatement,
    Statement, TableName, TransactionCommand, UpdateStatement,
};
