//! Top-level error type.

use tessera_common::{ConfigError, ErrorCode};
use tessera_txn::TxnError;
use thiserror::Error;

use crate::executor::ExecutionError;
use crate::planner::PlanError;

/// Any failure surfaced by [`Engine`](crate::Engine).
#[derive(Debug, Error)]
pub enum SqlError {
    /// The statement could not be planned.
    #[error("cannot plan: {0}")]
    Plan(#[from] PlanError),

    /// The plan failed while running.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Direct transaction control failed.
    #[error(transparent)]
    Txn(#[from] TxnError),

    /// The engine configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SqlError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Plan(e) => e.code(),
            Self::Execution(e) => e.code(),
            Self::Txn(e) => e.code(),
            Self::Config(e) => e.code(),
        }
    }
}

/// Result type for engine operations.
pub type SqlResult<T> = Result<T, SqlError>;
