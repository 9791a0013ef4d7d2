//! Terminal operators for catalog changes, transaction control and SHOW.
//!
//! `IF NOT EXISTS` and `IF EXISTS` are handled here: the catalog always
//! reports the raw condition and these operators decide whether it is an
//! error.

use tessera_common::{DataType, Row, Value};
use tracing::{info, warn};

use super::{ColumnHeader, ExecContext, ExecResult, ExecutionResult, Operator, ResultSet};
use crate::ast::{DropTarget, TransactionCommand};
use crate::catalog::{CatalogError, Index, Table};
use crate::planner::{CreateIndexPlan, CreateTablePlan, DropPlan, ShowPlan};

fn ddl(command: &str) -> ExecutionResult {
    ExecutionResult::Ddl {
        command: command.to_string(),
    }
}

/// CREATE TABLE.
#[derive(Debug)]
pub struct CreateTableExec {
    plan: CreateTablePlan,
}

impl CreateTableExec {
    /// Creates the operator.
    pub fn new(plan: CreateTablePlan) -> Self {
        Self { plan }
    }
}

impl Operator for CreateTableExec {
    fn name(&self) -> &'static str {
        "CreateTable"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let plan = &self.plan;
        let table = Table::new(
            plan.table.clone(),
            plan.columns.clone(),
            ctx.config.storage.tuple_group_size,
        )?;
        match ctx.catalog.insert_table(table) {
            Ok(table) => info!(table = %table.name(), "created table"),
            Err(CatalogError::TableExists(name)) if plan.if_not_exists => {
                warn!(table = %name, "table already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(ddl("CREATE TABLE"))
    }
}

/// CREATE INDEX. Registers the definition only.
#[derive(Debug)]
pub struct CreateIndexExec {
    plan: CreateIndexPlan,
}

impl CreateIndexExec {
    /// Creates the operator.
    pub fn new(plan: CreateIndexPlan) -> Self {
        Self { plan }
    }
}

impl Operator for CreateIndexExec {
    fn name(&self) -> &'static str {
        "CreateIndex"
    }

    fn execute(&mut self, _ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let plan = &self.plan;
        let index = Index::new(plan.name.clone(), plan.columns.clone());
        match plan.table.add_index(index) {
            Ok(()) => info!(index = %plan.name, table = %plan.table.name(), "created index"),
            Err(CatalogError::IndexExists { table, index }) if plan.if_not_exists => {
                warn!(%index, %table, "index already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(ddl("CREATE INDEX"))
    }
}

/// DROP TABLE, DROP SCHEMA and DROP INDEX.
#[derive(Debug)]
pub struct DropExec {
    plan: DropPlan,
}

impl DropExec {
    /// Creates the operator.
    pub fn new(plan: DropPlan) -> Self {
        Self { plan }
    }

    fn drop_target(&self, ctx: &ExecContext<'_>) -> Result<(), CatalogError> {
        match &self.plan.target {
            DropTarget::Table(name) => {
                ctx.catalog.drop_table(&name.schema, &name.name)?;
                info!(table = %name, "dropped table");
            }
            DropTarget::Schema(schema) => {
                let dropped = ctx.catalog.drop_schema(schema)?;
                if dropped == 0 {
                    return Err(CatalogError::SchemaNotFound(schema.clone()));
                }
                info!(%schema, tables = dropped, "dropped schema");
            }
            DropTarget::Index { table, name } => {
                ctx.catalog
                    .get_table(&table.schema, &table.name)?
                    .drop_index(name)?;
                info!(index = %name, %table, "dropped index");
            }
        }
        Ok(())
    }
}

impl Operator for DropExec {
    fn name(&self) -> &'static str {
        "Drop"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        match self.drop_target(ctx) {
            Ok(()) => {}
            Err(
                e @ (CatalogError::TableNotFound(_)
                | CatalogError::SchemaNotFound(_)
                | CatalogError::IndexNotFound { .. }),
            ) if self.plan.if_exists => {
                warn!(error = %e, "nothing to drop, skipping");
            }
            Err(e) => return Err(e.into()),
        }
        let command = match self.plan.target {
            DropTarget::Table(_) => "DROP TABLE",
            DropTarget::Schema(_) => "DROP SCHEMA",
            DropTarget::Index { .. } => "DROP INDEX",
        };
        Ok(ddl(command))
    }
}

/// BEGIN, COMMIT and ROLLBACK.
#[derive(Debug)]
pub struct TransactionExec {
    command: TransactionCommand,
}

impl TransactionExec {
    /// Creates the operator.
    pub fn new(command: TransactionCommand) -> Self {
        Self { command }
    }
}

impl Operator for TransactionExec {
    fn name(&self) -> &'static str {
        "Transaction"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        match self.command {
            TransactionCommand::Begin => {
                ctx.txn.begin()?;
                info!("transaction started");
            }
            TransactionCommand::Commit => {
                let discarded = ctx.txn.commit()?;
                info!(discarded, "transaction committed");
            }
            TransactionCommand::Rollback => {
                let undone = ctx.txn.rollback()?;
                info!(undone, "transaction rolled back");
            }
        }
        Ok(ExecutionResult::Transaction {
            command: self.command.to_string(),
        })
    }
}

/// SHOW TABLES and SHOW COLUMNS.
#[derive(Debug)]
pub struct ShowExec {
    plan: ShowPlan,
}

impl ShowExec {
    /// Creates the operator.
    pub fn new(plan: ShowPlan) -> Self {
        Self { plan }
    }
}

impl Operator for ShowExec {
    fn name(&self) -> &'static str {
        "Show"
    }

    fn execute(&mut self, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let text = DataType::Varchar(ctx.config.storage.max_string_length);
        let result = match &self.plan {
            ShowPlan::Tables => {
                let rows = ctx
                    .catalog
                    .list_tables()
                    .iter()
                    .map(|table| {
                        let name = table.name();
                        Row::new(vec![
                            Value::from(name.schema.as_str()),
                            Value::from(name.name.as_str()),
                        ])
                    })
                    .collect();
                ResultSet::new(
                    vec![ColumnHeader::new("schema", text), ColumnHeader::new("name", text)],
                    rows,
                )
            }
            ShowPlan::Columns(table) => {
                let rows = table
                    .columns()
                    .iter()
                    .map(|column| {
                        let nullable = if column.nullable { "YES" } else { "NO" };
                        Row::new(vec![
                            Value::from(column.name.as_str()),
                            Value::from(column.data_type.to_string()),
                            Value::from(nullable),
                        ])
                    })
                    .collect();
                ResultSet::new(
                    vec![
                        ColumnHeader::new("name", text),
                        ColumnHeader::new("type", text),
                        ColumnHeader::new("nullable", text),
                    ],
                    rows,
                )
            }
        };
        Ok(ExecutionResult::Query(result))
    }
}
