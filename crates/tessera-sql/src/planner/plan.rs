//! Plan chain representation.
//!
//! A plan is a singly linked chain of typed nodes. The head is the terminal
//! node; `next` leads toward the leaf, which for queries and row mutations
//! is always a sequential scan:
//!
//! ```text
//! Select ──► Limit ──► Sort ──► Filter ──► SeqScan
//! Update ──► Filter ──► SeqScan
//! Insert
//! ```

use std::fmt;
use std::sync::Arc;

use tessera_common::ColumnDef;

use crate::ast::{DropTarget, Literal, TableName, TransactionCommand};
use crate::catalog::Table;
use crate::executor::ColumnHeader;

/// A plan chain.
#[derive(Debug, Clone)]
pub struct Plan {
    /// This node.
    pub node: PlanNode,
    /// Child node, toward the scan.
    pub next: Option<Box<Plan>>,
}

impl Plan {
    /// Creates a chain of one node.
    pub fn leaf(node: PlanNode) -> Self {
        Self { node, next: None }
    }

    /// Places `node` on top of `child`.
    pub fn on_top(node: PlanNode, child: Plan) -> Self {
        Self {
            node,
            next: Some(Box::new(child)),
        }
    }

    /// Iterates over the chain from the terminal node to the leaf.
    pub fn iter(&self) -> impl Iterator<Item = &PlanNode> {
        std::iter::successors(Some(self), |plan| plan.next.as_deref()).map(|plan| &plan.node)
    }

    /// Returns the number of nodes in the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// A chain is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns a human-readable rendering, one node per line.
    pub fn explain(&self) -> String {
        let mut output = String::new();
        for (depth, node) in self.iter().enumerate() {
            output.push_str(&"  ".repeat(depth));
            output.push_str(&node.to_string());
            output.push('\n');
        }
        output
    }
}

/// One node of a plan chain.
#[derive(Debug, Clone)]
pub enum PlanNode {
    /// CREATE TABLE.
    CreateTable(CreateTablePlan),
    /// CREATE INDEX.
    CreateIndex(CreateIndexPlan),
    /// DROP TABLE / SCHEMA / INDEX.
    Drop(DropPlan),
    /// INSERT one row.
    Insert(InsertPlan),
    /// UPDATE every row produced by the child.
    Update(UpdatePlan),
    /// DELETE every row produced by the child.
    Delete(DeletePlan),
    /// Collect and project every row produced by the child.
    Select(SelectPlan),
    /// Sequential scan of a table.
    Scan(ScanPlan),
    /// Equality filter.
    Filter(FilterPlan),
    /// Sort by columns.
    Sort(SortPlan),
    /// Skip and cap rows.
    Limit(LimitPlan),
    /// BEGIN / COMMIT / ROLLBACK.
    Transaction(TransactionCommand),
    /// SHOW TABLES / SHOW COLUMNS.
    Show(ShowPlan),
}

impl PlanNode {
    /// Returns the node name.
    pub fn name(&self) -> &'static str {
        match self {
            PlanNode::CreateTable(_) => "CreateTable",
            PlanNode::CreateIndex(_) => "CreateIndex",
            PlanNode::Drop(_) => "Drop",
            PlanNode::Insert(_) => "Insert",
            PlanNode::Update(_) => "Update",
            PlanNode::Delete(_) => "Delete",
            PlanNode::Select(_) => "Select",
            PlanNode::Scan(_) => "SeqScan",
            PlanNode::Filter(_) => "Filter",
            PlanNode::Sort(_) => "Sort",
            PlanNode::Limit(_) => "Limit",
            PlanNode::Transaction(_) => "Transaction",
            PlanNode::Show(_) => "Show",
        }
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            PlanNode::CreateTable(p) => write!(f, " (table={}, columns={})", p.table, p.columns.len()),
            PlanNode::CreateIndex(p) => {
                write!(f, " (index={}, table={}, columns={:?})", p.name, p.table.name(), p.columns)
            }
            PlanNode::Drop(p) => write!(f, " ({})", p.target),
            PlanNode::Insert(p) => write!(f, " (table={}, values={})", p.table.name(), p.values.len()),
            PlanNode::Update(p) => write!(f, " (table={}, columns={:?})", p.table.name(), p.columns),
            PlanNode::Delete(p) => write!(f, " (table={})", p.table.name()),
            PlanNode::Select(p) => write!(f, " (columns={:?})", p.columns),
            PlanNode::Scan(p) => write!(f, " (table={})", p.table.name()),
            PlanNode::Filter(p) => write!(f, " (column={}, value={})", p.column, p.value),
            PlanNode::Sort(p) => {
                let keys: Vec<_> = p
                    .keys
                    .iter()
                    .map(|k| format!("{} {}", k.column, if k.asc { "ASC" } else { "DESC" }))
                    .collect();
                write!(f, " (keys=[{}])", keys.join(", "))
            }
            PlanNode::Limit(p) => match p.limit {
                Some(limit) => write!(f, " (limit={}, offset={})", limit, p.offset),
                None => write!(f, " (offset={})", p.offset),
            },
            PlanNode::Transaction(command) => write!(f, " ({})", command),
            PlanNode::Show(ShowPlan::Tables) => write!(f, " (tables)"),
            PlanNode::Show(ShowPlan::Columns(table)) => write!(f, " (columns of {})", table.name()),
        }
    }
}

/// CREATE TABLE node.
#[derive(Debug, Clone)]
pub struct CreateTablePlan {
    /// Table to create.
    pub table: TableName,
    /// Columns in declared order.
    pub columns: Vec<ColumnDef>,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
}

/// CREATE INDEX node.
#[derive(Debug, Clone)]
pub struct CreateIndexPlan {
    /// Index name.
    pub name: String,
    /// Resolved table.
    pub table: Arc<Table>,
    /// Resolved column positions.
    pub columns: Vec<usize>,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
}

/// DROP node. Resolution happens at execution so IF EXISTS can apply.
#[derive(Debug, Clone)]
pub struct DropPlan {
    /// What to drop.
    pub target: DropTarget,
    /// IF EXISTS.
    pub if_exists: bool,
}

/// INSERT node.
#[derive(Debug, Clone)]
pub struct InsertPlan {
    /// Resolved table.
    pub table: Arc<Table>,
    /// One value per column, in declared order.
    pub values: Vec<Literal>,
}

/// UPDATE node.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    /// Resolved table.
    pub table: Arc<Table>,
    /// Column positions to overwrite.
    pub columns: Vec<usize>,
    /// Replacement values, paired positionally with `columns`.
    pub values: Vec<Literal>,
}

/// DELETE node.
#[derive(Debug, Clone)]
pub struct DeletePlan {
    /// Resolved table.
    pub table: Arc<Table>,
}

/// SELECT node.
#[derive(Debug, Clone)]
pub struct SelectPlan {
    /// Output column positions.
    pub columns: Vec<usize>,
    /// Output headers, one per output column.
    pub headers: Vec<ColumnHeader>,
}

/// Sequential scan node.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    /// Resolved table.
    pub table: Arc<Table>,
}

/// Filter node: `row[column] = value`.
#[derive(Debug, Clone)]
pub struct FilterPlan {
    /// Column position.
    pub column: usize,
    /// Literal to compare against.
    pub value: Literal,
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Column position.
    pub column: usize,
    /// Ascending order.
    pub asc: bool,
}

/// Sort node.
#[derive(Debug, Clone)]
pub struct SortPlan {
    /// Keys, most significant first.
    pub keys: Vec<SortKey>,
}

/// Limit node.
#[derive(Debug, Clone)]
pub struct LimitPlan {
    /// Maximum rows to return; `None` means no cap.
    pub limit: Option<u64>,
    /// Rows to skip first.
    pub offset: u64,
}

/// SHOW node.
#[derive(Debug, Clone)]
pub enum ShowPlan {
    /// Every table.
    Tables,
    /// Columns of one table.
    Columns(Arc<Table>),
}
