//! Statement representation.
//!
//! This module defines every statement kind the engine executes.

use serde::{Deserialize, Serialize};
use std::fmt;

use tessera_common::constants::QUALIFIED_NAME_SEPARATOR;
use tessera_common::ColumnDef;

use super::Expr;

/// A schema-qualified table name. Both parts are required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName {
    /// Schema name.
    pub schema: String,
    /// Table name.
    pub name: String,
}

impl TableName {
    /// Creates a qualified table name.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.schema, QUALIFIED_NAME_SEPARATOR, self.name)
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// CREATE TABLE
    CreateTable(CreateTableStatement),
    /// CREATE INDEX
    CreateIndex(CreateIndexStatement),
    /// DROP TABLE / SCHEMA / INDEX
    Drop(DropStatement),
    /// INSERT
    Insert(InsertStatement),
    /// UPDATE
    Update(UpdateStatement),
    /// DELETE
    Delete(DeleteStatement),
    /// SELECT
    Select(SelectStatement),
    /// BEGIN / COMMIT / ROLLBACK
    Transaction(TransactionCommand),
    /// SHOW TABLES / SHOW COLUMNS
    Show(ShowStatement),
}

impl Statement {
    /// Returns true if the statement changes table rows.
    pub fn is_dml(&self) -> bool {
        matches!(
            self,
            Statement::Insert(_) | Statement::Update(_) | Statement::Delete(_)
        )
    }
}

// =============================================================================
// DDL
// =============================================================================

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableStatement {
    /// Table to create.
    pub table: TableName,
    /// Column definitions in declared order.
    pub columns: Vec<ColumnDef>,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
}

impl CreateTableStatement {
    /// Creates a CREATE TABLE statement.
    pub fn new(table: TableName, columns: Vec<ColumnDef>) -> Self {
        Self {
            table,
            columns,
            if_not_exists: false,
        }
    }

    /// Adds IF NOT EXISTS.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexStatement {
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: TableName,
    /// Indexed column names, in order.
    pub columns: Vec<String>,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
}

impl CreateIndexStatement {
    /// Creates a CREATE INDEX statement.
    pub fn new(name: impl Into<String>, table: TableName, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            table,
            columns,
            if_not_exists: false,
        }
    }

    /// Adds IF NOT EXISTS.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// What a DROP statement removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// One table.
    Table(TableName),
    /// Every table in a schema.
    Schema(String),
    /// A named index on a table.
    Index {
        /// Table the index belongs to.
        table: TableName,
        /// Index name.
        name: String,
    },
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Table(table) => write!(f, "table {}", table),
            DropTarget::Schema(schema) => write!(f, "schema {}", schema),
            DropTarget::Index { table, name } => write!(f, "index {} on {}", name, table),
        }
    }
}

/// DROP statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropStatement {
    /// Object to drop.
    pub target: DropTarget,
    /// IF EXISTS.
    pub if_exists: bool,
}

impl DropStatement {
    /// DROP TABLE.
    pub fn table(table: TableName) -> Self {
        Self {
            target: DropTarget::Table(table),
            if_exists: false,
        }
    }

    /// DROP SCHEMA.
    pub fn schema(schema: impl Into<String>) -> Self {
        Self {
            target: DropTarget::Schema(schema.into()),
            if_exists: false,
        }
    }

    /// DROP INDEX.
    pub fn index(table: TableName, name: impl Into<String>) -> Self {
        Self {
            target: DropTarget::Index {
                table,
                name: name.into(),
            },
            if_exists: false,
        }
    }

    /// Adds IF EXISTS.
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

// =============================================================================
// DML
// =============================================================================

/// INSERT statement with a single row of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertStatement {
    /// Target table.
    pub table: TableName,
    /// Explicit column list; `None` means every column in declared order.
    pub columns: Option<Vec<String>>,
    /// Values, positionally matched to the columns.
    pub values: Vec<Expr>,
}

impl InsertStatement {
    /// INSERT INTO table VALUES (...).
    pub fn new(table: TableName, values: Vec<Expr>) -> Self {
        Self {
            table,
            columns: None,
            values,
        }
    }

    /// Sets an explicit column list.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// One `column = value` pair of an UPDATE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Column to set.
    pub column: String,
    /// Replacement value.
    pub value: Expr,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatement {
    /// Target table.
    pub table: TableName,
    /// SET clause.
    pub assignments: Vec<Assignment>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

impl UpdateStatement {
    /// Creates an UPDATE statement without a WHERE clause.
    pub fn new(table: TableName, assignments: Vec<Assignment>) -> Self {
        Self {
            table,
            assignments,
            where_clause: None,
        }
    }

    /// Sets the WHERE clause.
    pub fn with_where(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(predicate);
        self
    }
}

/// DELETE statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteStatement {
    /// Target table.
    pub table: TableName,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

impl DeleteStatement {
    /// Creates a DELETE statement without a WHERE clause.
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            where_clause: None,
        }
    }

    /// Sets the WHERE clause.
    pub fn with_where(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(predicate);
        self
    }
}

// =============================================================================
// Queries
// =============================================================================

/// An item in the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectItem {
    /// `*`
    Wildcard,
    /// A named column.
    Column(String),
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByExpr {
    /// Column to sort by.
    pub column: String,
    /// Ascending order.
    pub asc: bool,
}

/// SELECT statement over a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// Source table.
    pub table: TableName,
    /// Output columns.
    pub projection: Vec<SelectItem>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// ORDER BY keys, most significant first.
    pub order_by: Vec<OrderByExpr>,
    /// LIMIT.
    pub limit: Option<u64>,
    /// OFFSET.
    pub offset: Option<u64>,
}

impl SelectStatement {
    /// SELECT * FROM table.
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            projection: vec![SelectItem::Wildcard],
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Replaces the projection with the named columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = columns
            .into_iter()
            .map(|c| SelectItem::Column(c.into()))
            .collect();
        self
    }

    /// Sets the WHERE clause.
    pub fn with_where(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    /// Appends an ORDER BY key.
    pub fn order_by(mut self, column: impl Into<String>, asc: bool) -> Self {
        self.order_by.push(OrderByExpr {
            column: column.into(),
            asc,
        });
        self
    }

    /// Sets LIMIT.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets OFFSET.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

// =============================================================================
// Control
// =============================================================================

/// Transaction control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionCommand {
    /// BEGIN
    Begin,
    /// COMMIT
    Commit,
    /// ROLLBACK
    Rollback,
}

impl fmt::Display for TransactionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionCommand::Begin => write!(f, "BEGIN"),
            TransactionCommand::Commit => write!(f, "COMMIT"),
            TransactionCommand::Rollback => write!(f, "ROLLBACK"),
        }
    }
}

/// SHOW statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowStatement {
    /// SHOW TABLES
    Tables,
    /// SHOW COLUMNS FROM table
    Columns(TableName),
}
