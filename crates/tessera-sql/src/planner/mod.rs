//! Statement lowering.
//!
//! The planner turns one statement into one [`Plan`] chain using fixed
//! rules: no costing, no reordering.

mod error;
mod plan;

use std::collections::HashSet;
use std::sync::Arc;

use tessera_common::EngineConfig;
use tracing::debug;

use crate::ast::{
    BinaryOperator, CreateIndexStatement, CreateTableStatement, DeleteStatement, Expr,
    InsertStatement, Literal, SelectItem, SelectStatement, ShowStatement, Statement, TableName,
    UpdateStatement,
};
use crate::catalog::{Catalog, Table};
use crate::executor::ColumnHeader;

pub use error::{PlanError, PlanResult};
pub use plan::{
    CreateIndexPlan, CreateTablePlan, DeletePlan, DropPlan, FilterPlan, InsertPlan, LimitPlan,
    Plan, PlanNode, ScanPlan, SelectPlan, ShowPlan, SortKey, SortPlan, UpdatePlan,
};

/// Lowers statements against a catalog. Planning never changes the catalog.
#[derive(Debug)]
pub struct Planner<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> Planner<'a> {
    /// Creates a planner.
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Builds the plan chain for one statement.
    pub fn create_plan(&self, stmt: &Statement) -> PlanResult<Plan> {
        let plan = match stmt {
            Statement::CreateTable(create) => self.plan_create_table(create)?,
            Statement::CreateIndex(create) => self.plan_create_index(create)?,
            Statement::Drop(drop) => Plan::leaf(PlanNode::Drop(DropPlan {
                target: drop.target.clone(),
                if_exists: drop.if_exists,
            })),
            Statement::Insert(insert) => self.plan_insert(insert)?,
            Statement::Update(update) => self.plan_update(update)?,
            Statement::Delete(delete) => self.plan_delete(delete)?,
            Statement::Select(select) => self.plan_select(select)?,
            Statement::Transaction(command) => Plan::leaf(PlanNode::Transaction(*command)),
            Statement::Show(show) => self.plan_show(show)?,
        };
        debug!(plan = %plan.explain().trim_end(), "created plan");
        Ok(plan)
    }

    // =========================================================================
    // DDL
    // =========================================================================

    fn plan_create_table(&self, create: &CreateTableStatement) -> PlanResult<Plan> {
        let max = self.config.storage.max_string_length;
        for column in &create.columns {
            if let Some(length) = column.data_type.string_capacity() {
                if length > max {
                    return Err(PlanError::StringLengthTooLarge {
                        column: column.name.clone(),
                        length,
                        max,
                    });
                }
            }
        }

        Ok(Plan::leaf(PlanNode::CreateTable(CreateTablePlan {
            table: create.table.clone(),
            columns: create.columns.clone(),
            if_not_exists: create.if_not_exists,
        })))
    }

    fn plan_create_index(&self, create: &CreateIndexStatement) -> PlanResult<Plan> {
        let table = self.resolve_table(&create.table)?;
        let mut columns = Vec::with_capacity(create.columns.len());
        for name in &create.columns {
            columns.push(resolve_column(&table, name)?);
        }

        Ok(Plan::leaf(PlanNode::CreateIndex(CreateIndexPlan {
            name: create.name.clone(),
            table,
            columns,
            if_not_exists: create.if_not_exists,
        })))
    }

    // =========================================================================
    // DML
    // =========================================================================

    fn plan_insert(&self, insert: &InsertStatement) -> PlanResult<Plan> {
        let table = self.resolve_table(&insert.table)?;
        let width = table.columns().len();

        let positions: Vec<usize> = match &insert.columns {
            None => (0..width).collect(),
            Some(names) => {
                let mut seen = HashSet::with_capacity(names.len());
                let mut positions = Vec::with_capacity(names.len());
                for name in names {
                    let position = resolve_column(&table, name)?;
                    if !seen.insert(position) {
                        return Err(PlanError::DuplicateColumn {
                            column: name.clone(),
                        });
                    }
                    positions.push(position);
                }
                positions
            }
        };

        if positions.len() != insert.values.len() {
            return Err(PlanError::ValueCountMismatch {
                expected: positions.len(),
                actual: insert.values.len(),
            });
        }

        // Columns left out of an explicit list are NULL.
        let mut values = vec![Literal::Null; width];
        for (position, expr) in positions.into_iter().zip(&insert.values) {
            values[position] = literal_of(expr)?;
        }

        Ok(Plan::leaf(PlanNode::Insert(InsertPlan { table, values })))
    }

    fn plan_update(&self, update: &UpdateStatement) -> PlanResult<Plan> {
        let table = self.resolve_table(&update.table)?;
        let mut columns = Vec::with_capacity(update.assignments.len());
        let mut values = Vec::with_capacity(update.assignments.len());
        for assignment in &update.assignments {
            columns.push(resolve_column(&table, &assignment.column)?);
            values.push(literal_of(&assignment.value)?);
        }

        let child = self.plan_scan(&table, update.where_clause.as_ref())?;
        Ok(Plan::on_top(
            PlanNode::Update(UpdatePlan {
                table,
                columns,
                values,
            }),
            child,
        ))
    }

    fn plan_delete(&self, delete: &DeleteStatement) -> PlanResult<Plan> {
        let table = self.resolve_table(&delete.table)?;
        let child = self.plan_scan(&table, delete.where_clause.as_ref())?;
        Ok(Plan::on_top(PlanNode::Delete(DeletePlan { table }), child))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn plan_select(&self, select: &SelectStatement) -> PlanResult<Plan> {
        let table = self.resolve_table(&select.table)?;

        let mut columns = Vec::new();
        for item in &select.projection {
            match item {
                SelectItem::Wildcard => columns.extend(0..table.columns().len()),
                SelectItem::Column(name) => columns.push(resolve_column(&table, name)?),
            }
        }
        let headers = columns
            .iter()
            .map(|&i| ColumnHeader::from(&table.columns()[i]))
            .collect();

        let mut plan = self.plan_scan(&table, select.where_clause.as_ref())?;

        if !select.order_by.is_empty() {
            let mut keys = Vec::with_capacity(select.order_by.len());
            for key in &select.order_by {
                keys.push(SortKey {
                    column: resolve_column(&table, &key.column)?,
                    asc: key.asc,
                });
            }
            plan = Plan::on_top(PlanNode::Sort(SortPlan { keys }), plan);
        }

        if select.limit.is_some() || select.offset.is_some() {
            plan = Plan::on_top(
                PlanNode::Limit(LimitPlan {
                    limit: select.limit,
                    offset: select.offset.unwrap_or(0),
                }),
                plan,
            );
        }

        Ok(Plan::on_top(
            PlanNode::Select(SelectPlan { columns, headers }),
            plan,
        ))
    }

    fn plan_show(&self, show: &ShowStatement) -> PlanResult<Plan> {
        let target = match show {
            ShowStatement::Tables => ShowPlan::Tables,
            ShowStatement::Columns(name) => ShowPlan::Columns(self.resolve_table(name)?),
        };
        Ok(Plan::leaf(PlanNode::Show(target)))
    }

    /// Builds `Filter? ──► SeqScan` for a table.
    fn plan_scan(&self, table: &Arc<Table>, predicate: Option<&Expr>) -> PlanResult<Plan> {
        let scan = Plan::leaf(PlanNode::Scan(ScanPlan {
            table: Arc::clone(table),
        }));
        match predicate {
            None => Ok(scan),
            Some(expr) => {
                let filter = lower_predicate(table, expr)?;
                Ok(Plan::on_top(PlanNode::Filter(filter), scan))
            }
        }
    }

    fn resolve_table(&self, name: &TableName) -> PlanResult<Arc<Table>> {
        Ok(self.catalog.get_table(&name.schema, &name.name)?)
    }
}

fn resolve_column(table: &Table, name: &str) -> PlanResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| PlanError::ColumnNotFound {
            table: table.name().clone(),
            column: name.to_string(),
        })
}

fn literal_of(expr: &Expr) -> PlanResult<Literal> {
    expr.as_literal()
        .cloned()
        .ok_or_else(|| PlanError::Unsupported(format!("non-literal value {}", expr)))
}

/// Lowers `column = literal` or `literal = column`. Every other shape is
/// rejected.
fn lower_predicate(table: &Table, expr: &Expr) -> PlanResult<FilterPlan> {
    if let Expr::BinaryOp {
        left,
        op: BinaryOperator::Eq,
        right,
    } = expr
    {
        match (left.as_ref(), right.as_ref()) {
            (Expr::Column(name), Expr::Literal(value)) | (Expr::Literal(value), Expr::Column(name)) => {
                return Ok(FilterPlan {
                    column: resolve_column(table, name)?,
                    value: value.clone(),
                });
            }
            _ => {}
        }
    }
    Err(PlanError::Unsupported(format!("predicate {}", expr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Assignment, DropStatement, TransactionCommand};
    use tessera_common::{ColumnDef, DataType, ErrorCode};

    fn setup() -> (Catalog, EngineConfig) {
        let catalog = Catalog::new();
        let table = Table::new(
            TableName::new("s", "t"),
            vec![
                ColumnDef::new("a", DataType::Int),
                ColumnDef::new("b", DataType::Varchar(5)),
            ],
            4,
        )
        .unwrap();
        catalog.insert_table(table).unwrap();
        (catalog, EngineConfig::for_testing())
    }

    fn t() -> TableName {
        TableName::new("s", "t")
    }

    fn names(plan: &Plan) -> Vec<&'static str> {
        plan.iter().map(PlanNode::name).collect()
    }

    #[test]
    fn test_select_without_where() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let plan = planner
            .create_plan(&Statement::Select(SelectStatement::new(t())))
            .unwrap();
        assert_eq!(names(&plan), vec!["Select", "SeqScan"]);

        let PlanNode::Select(select) = &plan.node else {
            panic!("expected select");
        };
        assert_eq!(select.columns, vec![0, 1]);
        assert_eq!(select.headers[1].name, "b");
    }

    #[test]
    fn test_select_with_where_order_limit() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let stmt = SelectStatement::new(t())
            .with_columns(["b"])
            .with_where(Expr::int(2).equals(Expr::col("a")))
            .order_by("b", false)
            .with_offset(1);
        let plan = planner.create_plan(&Statement::Select(stmt)).unwrap();
        assert_eq!(names(&plan), vec!["Select", "Limit", "Sort", "Filter", "SeqScan"]);

        let filter = plan
            .iter()
            .find_map(|node| match node {
                PlanNode::Filter(f) => Some(f.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(filter.column, 0);
        assert_eq!(filter.value, Literal::Integer(2));
        assert_eq!(plan.len(), 5);
        assert!(plan.explain().contains("Limit (offset=1)"));
    }

    #[test]
    fn test_unsupported_predicates() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        for predicate in [
            Expr::col("a").binary(BinaryOperator::Gt, Expr::int(1)),
            Expr::col("a").equals(Expr::col("b")),
            Expr::col("a")
                .equals(Expr::int(1))
                .binary(BinaryOperator::And, Expr::col("b").equals(Expr::string("x"))),
        ] {
            let stmt = Statement::Delete(DeleteStatement::new(t()).with_where(predicate));
            let err = planner.create_plan(&stmt).unwrap_err();
            assert_eq!(err.code(), ErrorCode::Unsupported);
        }
    }

    #[test]
    fn test_unknown_names() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);

        let missing_table = Statement::Select(SelectStatement::new(TableName::new("s", "nope")));
        assert_eq!(
            planner.create_plan(&missing_table).unwrap_err().code(),
            ErrorCode::NotFound
        );

        let missing_column = Statement::Update(UpdateStatement::new(
            t(),
            vec![Assignment::new("zz", Expr::int(1))],
        ));
        assert!(matches!(
            planner.create_plan(&missing_column),
            Err(PlanError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_update_plan() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let stmt = UpdateStatement::new(
            t(),
            vec![
                Assignment::new("b", Expr::string("x")),
                Assignment::new("a", Expr::int(7)),
            ],
        )
        .with_where(Expr::col("b").equals(Expr::string("y")));
        let plan = planner.create_plan(&Statement::Update(stmt)).unwrap();
        assert_eq!(names(&plan), vec!["Update", "Filter", "SeqScan"]);

        let PlanNode::Update(update) = &plan.node else {
            panic!("expected update");
        };
        assert_eq!(update.columns, vec![1, 0]);
        assert_eq!(
            update.values,
            vec![Literal::String("x".into()), Literal::Integer(7)]
        );
    }

    #[test]
    fn test_insert_with_column_list() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let stmt = InsertStatement::new(t(), vec![Expr::string("hi")]).with_columns(vec!["b".into()]);
        let plan = planner.create_plan(&Statement::Insert(stmt)).unwrap();
        let PlanNode::Insert(insert) = &plan.node else {
            panic!("expected insert");
        };
        assert_eq!(insert.values, vec![Literal::Null, Literal::String("hi".into())]);
        assert!(plan.next.is_none());
    }

    #[test]
    fn test_insert_value_count_mismatch() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let stmt = InsertStatement::new(t(), vec![Expr::int(1)]);
        assert!(matches!(
            planner.create_plan(&Statement::Insert(stmt)),
            Err(PlanError::ValueCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_create_index_resolves_columns() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let ok = CreateIndexStatement::new("idx", t(), vec!["b".into(), "a".into()]);
        let plan = planner.create_plan(&Statement::CreateIndex(ok)).unwrap();
        let PlanNode::CreateIndex(index) = &plan.node else {
            panic!("expected create index");
        };
        assert_eq!(index.columns, vec![1, 0]);

        let bad = CreateIndexStatement::new("idx", t(), vec!["c".into()]);
        assert!(planner.create_plan(&Statement::CreateIndex(bad)).is_err());
    }

    #[test]
    fn test_create_table_length_limit() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        let too_wide = CreateTableStatement::new(
            TableName::new("s", "wide"),
            vec![ColumnDef::new("c", DataType::Varchar(config.storage.max_string_length + 1))],
        );
        assert!(matches!(
            planner.create_plan(&Statement::CreateTable(too_wide)),
            Err(PlanError::StringLengthTooLarge { .. })
        ));
    }

    #[test]
    fn test_single_node_plans() {
        let (catalog, config) = setup();
        let planner = Planner::new(&catalog, &config);
        for stmt in [
            Statement::Transaction(TransactionCommand::Begin),
            Statement::Drop(DropStatement::table(TableName::new("s", "missing")).if_exists()),
            Statement::Show(ShowStatement::Tables),
            Statement::Show(ShowStatement::Columns(t())),
        ] {
            let plan = planner.create_plan(&stmt).unwrap();
            assert_eq!(plan.len(), 1);
        }
        assert_eq!(catalog.table_count(), 1);
    }
}
