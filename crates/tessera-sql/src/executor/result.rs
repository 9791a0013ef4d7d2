//! Statement results.

use std::fmt;

use tessera_common::{ColumnDef, DataType, Row};

/// Output column header: name and declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
}

impl ColumnHeader {
    /// Creates a header.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl From<&ColumnDef> for ColumnHeader {
    fn from(column: &ColumnDef) -> Self {
        Self::new(column.name.clone(), column.data_type)
    }
}

/// Rows returned by a query, with their headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// One header per output column.
    pub columns: Vec<ColumnHeader>,
    /// Output rows, in production order.
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Creates a result set.
    pub fn new(columns: Vec<ColumnHeader>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the header names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Result of executing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// DDL statement completed.
    Ddl {
        /// Command tag such as `CREATE TABLE`.
        command: String,
    },
    /// Query rows (SELECT, SHOW).
    Query(ResultSet),
    /// INSERT completed.
    Insert {
        /// Rows inserted.
        rows_affected: u64,
    },
    /// UPDATE completed.
    Update {
        /// Rows updated.
        rows_affected: u64,
    },
    /// DELETE completed.
    Delete {
        /// Rows deleted.
        rows_affected: u64,
    },
    /// Transaction control completed.
    Transaction {
        /// Command tag such as `BEGIN`.
        command: String,
    },
}

impl ExecutionResult {
    /// Returns the affected-row count for INSERT, UPDATE and DELETE.
    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            Self::Insert { rows_affected }
            | Self::Update { rows_affected }
            | Self::Delete { rows_affected } => Some(*rows_affected),
            _ => None,
        }
    }

    /// Returns the result set of a query.
    pub fn as_query(&self) -> Option<&ResultSet> {
        match self {
            Self::Query(result) => Some(result),
            _ => None,
        }
    }

    /// Consumes the result and returns the result set of a query.
    pub fn into_query(self) -> Option<ResultSet> {
        match self {
            Self::Query(result) => Some(result),
            _ => None,
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ddl { command } | Self::Transaction { command } => write!(f, "{}", command),
            Self::Query(result) => write!(f, "SELECT {}", result.row_count()),
            Self::Insert { rows_affected } => write!(f, "INSERT {}", rows_affected),
            Self::Update { rows_affected } => write!(f, "UPDATE {}", rows_affected),
            Self::Delete { rows_affected } => write!(f, "DELETE {}", rows_affected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::Value;

    #[test]
    fn test_result_tags() {
        let insert = ExecutionResult::Insert { rows_affected: 1 };
        assert_eq!(insert.to_string(), "INSERT 1");
        assert_eq!(insert.rows_affected(), Some(1));
        assert!(insert.as_query().is_none());

        let ddl = ExecutionResult::Ddl {
            command: "CREATE TABLE".into(),
        };
        assert_eq!(ddl.to_string(), "CREATE TABLE");
        assert_eq!(ddl.rows_affected(), None);
    }

    #[test]
    fn test_query_result() {
        let set = ResultSet::new(
            vec![ColumnHeader::new("a", DataType::Int)],
            vec![Row::new(vec![Value::Int(1)]), Row::new(vec![Value::Int(2)])],
        );
        let result = ExecutionResult::Query(set);
        assert_eq!(result.to_string(), "SELECT 2");
        assert_eq!(result.as_query().unwrap().column_names(), vec!["a"]);
    }
}
