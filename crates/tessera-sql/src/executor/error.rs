//! Execution error types.

use tessera_common::ErrorCode;
use tessera_storage::StorageError;
use tessera_txn::TxnError;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors raised while running a plan.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Table store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Catalog failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Transaction failure.
    #[error(transparent)]
    Txn(#[from] TxnError),

    /// A plan chain with a node where it cannot appear.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

impl ExecutionError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Storage(e) => e.code(),
            Self::Catalog(e) => e.code(),
            Self::Txn(e) => e.code(),
            Self::InvalidPlan(_) => ErrorCode::Internal,
        }
    }
}

/// Execution result type.
pub type ExecResult<T> = Result<T, ExecutionError>;
