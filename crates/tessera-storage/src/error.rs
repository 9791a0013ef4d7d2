//! Storage error types.

use tessera_common::{DataType, ErrorCode};
use thiserror::Error;

use crate::arena::TupleId;

/// Storage error type.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Wrong number of values for the table's columns.
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Number of columns.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A column position past the end of the layout.
    #[error("column index {index} out of range for {columns} columns")]
    ColumnOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of columns.
        columns: usize,
    },

    /// Value variant does not match the column type.
    #[error("column '{column}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Declared type.
        expected: DataType,
        /// Supplied value kind.
        actual: &'static str,
    },

    /// NULL written to a `NOT NULL` column.
    #[error("column '{column}' does not accept NULL")]
    NullViolation {
        /// Column name.
        column: String,
    },

    /// String longer than the column's declared length.
    #[error("value of {length} bytes exceeds capacity {capacity} of column '{column}'")]
    ValueTooLong {
        /// Column name.
        column: String,
        /// Byte length of the value.
        length: usize,
        /// Declared length.
        capacity: u32,
    },

    /// Integer outside the range of the column type.
    #[error("value {value} out of range for column '{column}' of type {data_type}")]
    IntegerOutOfRange {
        /// Column name.
        column: String,
        /// Supplied value.
        value: i64,
        /// Declared type.
        data_type: DataType,
    },

    /// String containing the terminator byte.
    #[error("string value for column '{column}' contains a NUL byte")]
    EmbeddedTerminator {
        /// Column name.
        column: String,
    },

    /// A tuple group could not be allocated.
    #[error("failed to allocate tuple group of {bytes} bytes")]
    AllocationFailed {
        /// Requested size.
        bytes: usize,
    },

    /// A tuple id that does not name a slot in the expected state.
    #[error("tuple {tuple} is not {expected}")]
    InvalidTuple {
        /// Offending tuple.
        tuple: TupleId,
        /// Expected slot state.
        expected: &'static str,
    },

    /// Column list or store parameters that cannot form a layout.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Tuple bytes that do not decode.
    #[error("corrupted tuple {tuple}: {reason}")]
    Corrupted {
        /// Offending tuple.
        tuple: TupleId,
        /// What failed to decode.
        reason: String,
    },
}

impl StorageError {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ArityMismatch { .. }
            | Self::ColumnOutOfRange { .. }
            | Self::TypeMismatch { .. }
            | Self::NullViolation { .. }
            | Self::EmbeddedTerminator { .. }
            | Self::InvalidLayout(_) => ErrorCode::InvalidArgument,
            Self::ValueTooLong { .. } | Self::IntegerOutOfRange { .. } => ErrorCode::Capacity,
            Self::AllocationFailed { .. } => ErrorCode::Resource,
            Self::InvalidTuple { .. } | Self::Corrupted { .. } => ErrorCode::Internal,
        }
    }
}

/// Storage result type.
pub type StorageResult<T> = Result<T, StorageError>;
