//! The engine context.

use parking_lot::Mutex;
use tessera_common::EngineConfig;
use tessera_txn::Transaction;
use tracing::{debug, warn};

use crate::ast::Statement;
use crate::catalog::Catalog;
use crate::executor::{ExecContext, ExecutionResult, QueryExecutor};
use crate::planner::{Plan, Planner};
use crate::{SqlError, SqlResult};

/// Owns the catalog, the transaction and the configuration, and runs one
/// statement at a time against them.
///
/// DML statements are atomic. Outside an explicit transaction each one runs
/// in an implicit transaction (when `executor.implicit_transactions` is
/// set); inside one, a failing statement is rolled back to a savepoint taken
/// before it and the transaction stays open. DDL is not transactional.
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    txn: Mutex<Transaction>,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with an empty catalog.
    pub fn new(config: EngineConfig) -> SqlResult<Self> {
        config.validate()?;
        Ok(Self {
            catalog: Catalog::new(),
            txn: Mutex::new(Transaction::new()),
            config,
        })
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns true while an explicit transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.txn.lock().is_active()
    }

    /// Plans a statement without running it.
    pub fn plan(&self, stmt: &Statement) -> SqlResult<Plan> {
        Ok(Planner::new(&self.catalog, &self.config).create_plan(stmt)?)
    }

    /// Plans and runs a statement.
    pub fn execute(&self, stmt: &Statement) -> SqlResult<ExecutionResult> {
        let plan = self.plan(stmt)?;
        let mut txn = self.txn.lock();
        let executor = QueryExecutor::new();

        if !stmt.is_dml() {
            let mut ctx = ExecContext::new(&self.catalog, &mut txn, &self.config);
            return Ok(executor.execute(&plan, &mut ctx)?);
        }

        if !txn.is_active() && self.config.executor.implicit_transactions {
            txn.begin()?;
            let result = {
                let mut ctx = ExecContext::new(&self.catalog, &mut txn, &self.config);
                executor.execute(&plan, &mut ctx)
            };
            return match result {
                Ok(result) => {
                    txn.commit()?;
                    Ok(result)
                }
                Err(e) => {
                    debug!(error = %e, "statement failed, rolling back implicit transaction");
                    if let Err(undo) = txn.rollback() {
                        warn!(error = %undo, "implicit rollback failed");
                    }
                    Err(e.into())
                }
            };
        }

        let savepoint = txn.savepoint();
        let result = {
            let mut ctx = ExecContext::new(&self.catalog, &mut txn, &self.config);
            executor.execute(&plan, &mut ctx)
        };
        result.map_err(|e| {
            debug!(error = %e, depth = savepoint.depth(), "statement failed, rolling back to savepoint");
            if let Err(undo) = txn.rollback_to(savepoint) {
                warn!(error = %undo, "savepoint rollback failed");
            }
            SqlError::from(e)
        })
    }

    /// Opens an explicit transaction.
    pub fn begin(&self) -> SqlResult<()> {
        Ok(self.txn.lock().begin()?)
    }

    /// Commits the open transaction. Returns the number of undo records
    /// discarded.
    pub fn commit(&self) -> SqlResult<usize> {
        Ok(self.txn.lock().commit()?)
    }

    /// Rolls back the open transaction. Returns the number of mutations
    /// reversed.
    pub fn rollback(&self) -> SqlResult<usize> {
        Ok(self.txn.lock().rollback()?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            catalog: Catalog::new(),
            txn: Mutex::new(Transaction::new()),
            config: EngineConfig::default(),
        }
    }
}
