//! Transaction error types.

use tessera_common::ErrorCode;
use tessera_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during transaction operations.
#[derive(Debug, Error)]
pub enum TxnError {
    /// `begin` was called while a transaction is active.
    #[error("a transaction is already active")]
    AlreadyActive,

    /// A savepoint that does not belong to the current transaction.
    #[error("savepoint {savepoint} is beyond the undo log of length {len}")]
    InvalidSavepoint {
        /// Savepoint depth.
        savepoint: usize,
        /// Current undo log length.
        len: usize,
    },

    /// Reversing or discarding an undo record failed.
    #[error("failed to apply {kind} undo: {source}")]
    Undo {
        /// Record kind.
        kind: &'static str,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

impl TxnError {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyActive => ErrorCode::Transaction,
            Self::InvalidSavepoint { .. } | Self::Undo { .. } => ErrorCode::Internal,
        }
    }
}

/// Result type for transaction operations.
pub type TxnResult<T> = Result<T, TxnError>;
