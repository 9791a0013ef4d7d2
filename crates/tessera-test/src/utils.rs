//! Test fixtures.

use std::sync::Once;

use tessera_common::{ColumnDef, DataType, EngineConfig, Row, Value};
use tessera_sql::ast::{
    CreateTableStatement, Expr, InsertStatement, SelectStatement, Statement, TableName,
};
use tessera_sql::{Engine, ExecutionResult, SqlResult};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Creates an engine with small tuple groups so growth paths are exercised.
pub fn test_engine() -> Engine {
    init_tracing();
    match Engine::new(EngineConfig::for_testing()) {
        Ok(engine) => engine,
        Err(e) => panic!("test config rejected: {}", e),
    }
}

/// Returns `app/<name>`.
pub fn table(name: &str) -> TableName {
    TableName::new("app", name)
}

/// Runs `CREATE TABLE app/t (a INT, b VARCHAR(5))` and returns the name.
pub fn create_ab_table(engine: &Engine) -> TableName {
    let name = table("t");
    let columns = vec![
        ColumnDef::new("a", DataType::Int),
        ColumnDef::new("b", DataType::Varchar(5)),
    ];
    must(engine.execute(&Statement::CreateTable(CreateTableStatement::new(
        name.clone(),
        columns,
    ))));
    name
}

/// Inserts `(a, b)` into a table created by [`create_ab_table`].
pub fn insert_ab(engine: &Engine, table: &TableName, a: i64, b: &str) -> SqlResult<ExecutionResult> {
    engine.execute(&Statement::Insert(InsertStatement::new(
        table.clone(),
        vec![Expr::int(a), Expr::string(b)],
    )))
}

/// Runs a SELECT and returns its rows.
pub fn select_rows(engine: &Engine, select: SelectStatement) -> Vec<Row> {
    match must(engine.execute(&Statement::Select(select))) {
        ExecutionResult::Query(result) => result.rows,
        other => panic!("expected rows, got {}", other),
    }
}

/// Returns every row of a table ordered by its first column.
pub fn sorted_rows(engine: &Engine, table: &TableName, first_column: &str) -> Vec<Row> {
    select_rows(
        engine,
        SelectStatement::new(table.clone()).order_by(first_column, true),
    )
}

/// Builds a row from `(a, b)`.
pub fn ab(a: i32, b: &str) -> Row {
    Row::new(vec![Value::Int(a), Value::from(b)])
}

/// Unwraps a result, panicking with its display form.
pub fn must<T>(result: SqlResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("statement failed: {} ({})", e, e.code()),
    }
}
