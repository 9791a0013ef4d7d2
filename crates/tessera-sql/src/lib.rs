//! # tessera-sql
//!
//! Catalog, planner and executor for Tessera.
//!
//! A statement flows through three stages:
//!
//! ```text
//! Statement ──► Planner ──► Plan chain ──► QueryExecutor ──► ExecutionResult
//!                  │                            │
//!                  ▼                            ▼
//!               Catalog                 TableStore + Transaction
//! ```
//!
//! [`Engine`] ties the stages together and owns the shared state.
//!
//! # Example
//!
//! ```
//! use tessera_common::{ColumnDef, DataType, EngineConfig};
//! use tessera_sql::ast::{CreateTableStatement, Expr, InsertStatement, SelectStatement, Statement, TableName};
//! use tessera_sql::Engine;
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let t = TableName::new("app", "t");
//!
//! engine.execute(&Statement::CreateTable(CreateTableStatement::new(
//!     t.clone(),
//!     vec![ColumnDef::new("a", DataType::Int), ColumnDef::new("b", DataType::Varchar(5))],
//! ))).unwrap();
//! engine.execute(&Statement::Insert(InsertStatement::new(
//!     t.clone(),
//!     vec![Expr::int(2), Expr::string("cd")],
//! ))).unwrap();
//!
//! let result = engine
//!     .execute(&Statement::Select(SelectStatement::new(t).with_where(Expr::col("a").equals(Expr::int(2)))))
//!     .unwrap();
//! assert_eq!(result.as_query().unwrap().row_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod catalog;
mod engine;
mod error;
pub mod executor;
pub mod planner;

pub use catalog::{Catalog, CatalogError, Table};
pub use engine::Engine;
pub use error::{SqlError, SqlResult};
pub use executor::{ColumnHeader, ExecutionError, ExecutionResult, ResultSet};
pub use planner::{Plan, PlanError, Planner};
