//! Table catalog.
//!
//! The catalog maps `(schema, name)` to tables. It lives as long as the
//! engine and starts empty.

mod error;
mod table;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::ast::TableName;

pub use error::{CatalogError, CatalogResult};
pub use table::{Index, Table};

fn check_name(name: &str, what: &'static str) -> CatalogResult<()> {
    if name.is_empty() {
        return Err(CatalogError::EmptyName { what });
    }
    Ok(())
}

fn key(schema: &str, name: &str) -> CatalogResult<TableName> {
    check_name(schema, "schema")?;
    check_name(name, "table")?;
    Ok(TableName::new(schema, name))
}

/// Table catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Tables by qualified name, ordered by schema then name.
    tables: RwLock<BTreeMap<TableName, Arc<Table>>>,
}

impl Catalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table. Fails if its name is taken; the catalog is left
    /// unchanged in that case.
    pub fn insert_table(&self, table: Table) -> CatalogResult<Arc<Table>> {
        let mut tables = self.tables.write();
        if tables.contains_key(table.name()) {
            return Err(CatalogError::TableExists(table.name().clone()));
        }
        let table = Arc::new(table);
        tables.insert(table.name().clone(), Arc::clone(&table));
        debug!(table = %table.name(), "registered table");
        Ok(table)
    }

    /// Removes a table and returns it.
    pub fn drop_table(&self, schema: &str, name: &str) -> CatalogResult<Arc<Table>> {
        let key = key(schema, name)?;
        self.tables
            .write()
            .remove(&key)
            .ok_or(CatalogError::TableNotFound(key))
    }

    /// Removes every table in `schema` and returns how many were removed.
    pub fn drop_schema(&self, schema: &str) -> CatalogResult<usize> {
        check_name(schema, "schema")?;
        let mut tables = self.tables.write();
        let before = tables.len();
        tables.retain(|key, _| key.schema != schema);
        Ok(before - tables.len())
    }

    /// Looks up a table.
    pub fn get_table(&self, schema: &str, name: &str) -> CatalogResult<Arc<Table>> {
        let key = key(schema, name)?;
        self.tables
            .read()
            .get(&key)
            .cloned()
            .ok_or(CatalogError::TableNotFound(key))
    }

    /// Returns true if any table belongs to `schema`.
    pub fn find_schema(&self, schema: &str) -> CatalogResult<bool> {
        check_name(schema, "schema")?;
        Ok(self.tables.read().keys().any(|key| key.schema == schema))
    }

    /// Looks up a named index on a table.
    pub fn get_index(&self, schema: &str, name: &str, index: &str) -> CatalogResult<Index> {
        check_name(index, "index")?;
        let table = self.get_table(schema, name)?;
        table
            .get_index(index)
            .ok_or_else(|| CatalogError::IndexNotFound {
                table: table.name().clone(),
                index: index.to_string(),
            })
    }

    /// Returns true if the table exists.
    pub fn table_exists(&self, schema: &str, name: &str) -> bool {
        self.get_table(schema, name).is_ok()
    }

    /// Returns every table, ordered by schema then name.
    pub fn list_tables(&self) -> Vec<Arc<Table>> {
        self.tables.read().values().cloned().collect()
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }
}
