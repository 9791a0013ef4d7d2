//! Catalog error types.

use tessera_common::ErrorCode;
use tessera_storage::StorageError;
use thiserror::Error;

use crate::ast::TableName;

/// Catalog error type.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An empty schema, table, index or column name.
    #[error("{what} name must not be empty")]
    EmptyName {
        /// Which kind of name.
        what: &'static str,
    },

    /// Table already exists.
    #[error("table {0} already exists")]
    TableExists(TableName),

    /// Table not found.
    #[error("table {0} does not exist")]
    TableNotFound(TableName),

    /// No table uses the schema.
    #[error("schema {0} does not exist")]
    SchemaNotFound(String),

    /// Index name already used on the table.
    #[error("index {index} already exists on {table}")]
    IndexExists {
        /// Owning table.
        table: TableName,
        /// Index name.
        index: String,
    },

    /// Index not found on the table.
    #[error("index {index} does not exist on {table}")]
    IndexNotFound {
        /// Owning table.
        table: TableName,
        /// Index name.
        index: String,
    },

    /// Two columns with the same name.
    #[error("column {column} is declared more than once in {table}")]
    DuplicateColumn {
        /// Table being created.
        table: TableName,
        /// Repeated column name.
        column: String,
    },

    /// A table without columns.
    #[error("table {0} must have at least one column")]
    NoColumns(TableName),

    /// The table store could not be created.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyName { .. } | Self::DuplicateColumn { .. } | Self::NoColumns(_) => {
                ErrorCode::InvalidArgument
            }
            Self::TableExists(_) | Self::IndexExists { .. } => ErrorCode::AlreadyExists,
            Self::TableNotFound(_) | Self::SchemaNotFound(_) | Self::IndexNotFound { .. } => {
                ErrorCode::NotFound
            }
            Self::Storage(e) => e.code(),
        }
    }
}

/// Catalog result type.
pub type CatalogResult<T> = Result<T, CatalogError>;
