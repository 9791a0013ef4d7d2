//! Operator construction and plan execution.

use tessera_common::EngineConfig;
use tessera_txn::Transaction;
use tracing::debug;

use super::{
    CreateIndexExec, CreateTableExec, DeleteExec, DropExec, ExecResult, ExecutionError,
    ExecutionResult, FilterExec, InsertExec, LimitExec, Operator, RowSource, SelectExec,
    SeqScanExec, ShowExec, SortExec, TransactionExec, UpdateExec,
};
use crate::ast::Literal;
use crate::catalog::Catalog;
use crate::planner::{Plan, PlanNode};

/// State shared by every operator of one statement.
#[derive(Debug)]
pub struct ExecContext<'a> {
    /// Table catalog.
    pub catalog: &'a Catalog,
    /// The engine's transaction; mutations record undo through it.
    pub txn: &'a mut Transaction,
    /// Engine configuration.
    pub config: &'a EngineConfig,
}

impl<'a> ExecContext<'a> {
    /// Creates a context.
    pub fn new(catalog: &'a Catalog, txn: &'a mut Transaction, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            txn,
            config,
        }
    }
}

/// Builds operator chains from plans and runs them.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryExecutor;

impl QueryExecutor {
    /// Creates an executor.
    pub fn new() -> Self {
        Self
    }

    /// Builds and runs the operator chain for `plan`.
    pub fn execute(&self, plan: &Plan, ctx: &mut ExecContext<'_>) -> ExecResult<ExecutionResult> {
        let mut root = self.build_operator(plan)?;
        debug!(operator = root.name(), "executing plan");
        root.execute(ctx)
    }

    /// Builds the terminal operator for the head of `plan` and, below it,
    /// the row sources for the rest of the chain.
    pub fn build_operator(&self, plan: &Plan) -> ExecResult<Box<dyn Operator>> {
        let operator: Box<dyn Operator> = match &plan.node {
            PlanNode::CreateTable(p) => Box::new(CreateTableExec::new(p.clone())),
            PlanNode::CreateIndex(p) => Box::new(CreateIndexExec::new(p.clone())),
            PlanNode::Drop(p) => Box::new(DropExec::new(p.clone())),
            PlanNode::Transaction(command) => Box::new(TransactionExec::new(*command)),
            PlanNode::Show(p) => Box::new(ShowExec::new(p.clone())),
            PlanNode::Insert(p) => Box::new(InsertExec::new(
                p.table.clone(),
                p.values.iter().map(Literal::to_value).collect(),
            )),
            PlanNode::Update(p) => Box::new(UpdateExec::new(
                p.table.clone(),
                self.build_child(plan)?,
                p.columns.clone(),
                p.values.iter().map(Literal::to_value).collect(),
            )),
            PlanNode::Delete(p) => {
                Box::new(DeleteExec::new(p.table.clone(), self.build_child(plan)?))
            }
            PlanNode::Select(p) => Box::new(SelectExec::new(
                self.build_child(plan)?,
                p.columns.clone(),
                p.headers.clone(),
            )),
            PlanNode::Scan(_) | PlanNode::Filter(_) | PlanNode::Sort(_) | PlanNode::Limit(_) => {
                return Err(ExecutionError::InvalidPlan(format!(
                    "{} cannot head a plan",
                    plan.node.name()
                )));
            }
        };
        Ok(operator)
    }

    /// Builds the row source for `plan` and everything below it.
    pub fn build_source(&self, plan: &Plan) -> ExecResult<Box<dyn RowSource>> {
        let source: Box<dyn RowSource> = match &plan.node {
            PlanNode::Scan(p) => {
                if plan.next.is_some() {
                    return Err(ExecutionError::InvalidPlan("SeqScan must be the leaf".into()));
                }
                Box::new(SeqScanExec::new(p.table.clone()))
            }
            PlanNode::Filter(p) => Box::new(FilterExec::new(
                self.build_child(plan)?,
                p.column,
                p.value.to_value(),
            )),
            PlanNode::Sort(p) => Box::new(SortExec::new(self.build_child(plan)?, p.keys.clone())),
            PlanNode::Limit(p) => {
                Box::new(LimitExec::new(self.build_child(plan)?, p.limit, p.offset))
            }
            other => {
                return Err(ExecutionError::InvalidPlan(format!(
                    "{} cannot produce rows",
                    other.name()
                )));
            }
        };
        Ok(source)
    }

    fn build_child(&self, plan: &Plan) -> ExecResult<Box<dyn RowSource>> {
        match plan.next.as_deref() {
            Some(child) => self.build_source(child),
            None => Err(ExecutionError::InvalidPlan(format!(
                "{} requires a child",
                plan.node.name()
            ))),
        }
    }
}
