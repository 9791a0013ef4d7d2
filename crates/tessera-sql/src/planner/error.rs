//! Planning error types.

use tessera_common::ErrorCode;
use thiserror::Error;

use crate::ast::TableName;
use crate::catalog::CatalogError;

/// Errors raised while lowering a statement into a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A table or index lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A column name that the table does not have.
    #[error("column {column} does not exist in {table}")]
    ColumnNotFound {
        /// Table searched.
        table: TableName,
        /// Missing column.
        column: String,
    },

    /// A column named twice where each may appear once.
    #[error("column {column} is specified more than once")]
    DuplicateColumn {
        /// Repeated column.
        column: String,
    },

    /// Number of values differs from number of target columns.
    #[error("expected {expected} values, got {actual}")]
    ValueCountMismatch {
        /// Target column count.
        expected: usize,
        /// Supplied value count.
        actual: usize,
    },

    /// A string column longer than the configured maximum.
    #[error("column {column} declares length {length}, maximum is {max}")]
    StringLengthTooLarge {
        /// Column name.
        column: String,
        /// Declared length.
        length: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A statement shape, expression or predicate that cannot be lowered.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl PlanError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Catalog(e) => e.code(),
            Self::ColumnNotFound { .. } => ErrorCode::NotFound,
            Self::DuplicateColumn { .. }
            | Self::ValueCountMismatch { .. }
            | Self::StringLengthTooLarge { .. } => ErrorCode::InvalidArgument,
            Self::Unsupported(_) => ErrorCode::Unsupported,
        }
    }
}

/// Planning result type.
pub type PlanResult<T> = Result<T, PlanError>;
