//! Table and index metadata.

use std::collections::HashSet;

use parking_lot::RwLock;
use tessera_common::ColumnDef;
use tessera_storage::{StoreHandle, TableStore};

use super::error::{CatalogError, CatalogResult};
use crate::ast::TableName;

/// A named index: metadata only, never used for access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name, unique within its table.
    pub name: String,
    /// Indexed column positions, in order.
    pub columns: Vec<usize>,
}

impl Index {
    /// Creates an index definition.
    pub fn new(name: impl Into<String>, columns: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// A table: its columns, indexes, and the store holding its rows.
#[derive(Debug)]
pub struct Table {
    name: TableName,
    columns: Vec<ColumnDef>,
    indexes: RwLock<Vec<Index>>,
    store: StoreHandle,
}

impl Table {
    /// Creates a table with an empty store.
    pub fn new(name: TableName, columns: Vec<ColumnDef>, group_size: usize) -> CatalogResult<Self> {
        super::check_name(&name.schema, "schema")?;
        super::check_name(&name.name, "table")?;
        if columns.is_empty() {
            return Err(CatalogError::NoColumns(name));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            super::check_name(&column.name, "column")?;
            if !seen.insert(column.name.as_str()) {
                return Err(CatalogError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        let store = StoreHandle::new(TableStore::new(columns.clone(), group_size)?);
        Ok(Self {
            name,
            columns,
            indexes: RwLock::new(Vec::new()),
            store,
        })
    }

    /// Returns the qualified name.
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Returns the schema name.
    pub fn schema(&self) -> &str {
        &self.name.schema
    }

    /// Returns the columns in declared order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the position of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns the table's store.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    // =========================================================================
    // Indexes
    // =========================================================================

    /// Returns a copy of the index definitions.
    pub fn indexes(&self) -> Vec<Index> {
        self.indexes.read().clone()
    }

    /// Looks up an index by name.
    pub fn get_index(&self, name: &str) -> Option<Index> {
        self.indexes.read().iter().find(|i| i.name == name).cloned()
    }

    /// Adds an index. Fails if the name is already used on this table.
    pub fn add_index(&self, index: Index) -> CatalogResult<()> {
        super::check_name(&index.name, "index")?;
        let mut indexes = self.indexes.write();
        if indexes.iter().any(|i| i.name == index.name) {
            return Err(CatalogError::IndexExists {
                table: self.name.clone(),
                index: index.name,
            });
        }
        indexes.push(index);
        Ok(())
    }

    /// Removes an index by name.
    pub fn drop_index(&self, name: &str) -> CatalogResult<Index> {
        let mut indexes = self.indexes.write();
        let position = indexes
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| CatalogError::IndexNotFound {
                table: self.name.clone(),
                index: name.to_string(),
            })?;
        Ok(indexes.remove(position))
    }
}
