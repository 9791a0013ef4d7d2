//! Tuple layout.
//!
//! A layout is computed once per table from its column list. It fixes the
//! tuple size, the position of every column's bytes, and which values each
//! column accepts.

use std::ops::Range;

use tessera_common::constants::{MAX_COLUMNS, NULL_FLAG_WIDTH};
use tessera_common::{ColumnDef, DataType, Value};

use crate::error::{StorageError, StorageResult};

/// Byte layout of one table's tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleLayout {
    columns: Vec<ColumnDef>,
    /// Cumulative column offsets from the start of the data area.
    /// Holds `columns.len() + 1` entries; the last one is the data area size.
    offsets: Vec<usize>,
    tuple_size: usize,
}

impl TupleLayout {
    /// Computes the layout for the given columns.
    pub fn new(columns: Vec<ColumnDef>) -> StorageResult<Self> {
        if columns.len() > MAX_COLUMNS {
            return Err(StorageError::InvalidLayout(format!(
                "{} columns exceeds the maximum of {}",
                columns.len(),
                MAX_COLUMNS
            )));
        }

        let mut offsets = Vec::with_capacity(columns.len() + 1);
        let mut offset = 0usize;
        offsets.push(offset);
        for column in &columns {
            offset += column.data_type.storage_width();
            offsets.push(offset);
        }

        let tuple_size = columns.len() * NULL_FLAG_WIDTH + offset;
        Ok(Self {
            columns,
            offsets,
            tuple_size,
        })
    }

    /// Returns the column definitions in declared order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the fixed size of one tuple in bytes.
    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    /// Returns the size of the null map in bytes.
    pub fn null_map_len(&self) -> usize {
        self.columns.len() * NULL_FLAG_WIDTH
    }

    /// Returns the byte position of a column's null flag within a tuple.
    pub fn null_flag_offset(&self, index: usize) -> usize {
        index * NULL_FLAG_WIDTH
    }

    /// Returns the byte range of a column's value within a tuple.
    pub fn column_range(&self, index: usize) -> Range<usize> {
        let base = self.null_map_len();
        base + self.offsets[index]..base + self.offsets[index + 1]
    }

    /// Returns the column at `index`, or an error if it does not exist.
    pub fn column(&self, index: usize) -> StorageResult<&ColumnDef> {
        self.columns.get(index).ok_or(StorageError::ColumnOutOfRange {
            index,
            columns: self.columns.len(),
        })
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks a full row of values against the columns.
    pub fn validate_row(&self, values: &[Value]) -> StorageResult<()> {
        if values.len() != self.columns.len() {
            return Err(StorageError::ArityMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        for (index, value) in values.iter().enumerate() {
            self.validate_value(index, value)?;
        }
        Ok(())
    }

    /// Checks column/value pairs used by an update.
    pub fn validate_assignments(&self, columns: &[usize], values: &[Value]) -> StorageResult<()> {
        if columns.len() != values.len() {
            return Err(StorageError::ArityMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        for (&index, value) in columns.iter().zip(values) {
            self.validate_value(index, value)?;
        }
        Ok(())
    }

    /// Checks that a value can be stored in the column at `index`.
    pub fn validate_value(&self, index: usize, value: &Value) -> StorageResult<()> {
        let column = self.column(index)?;
        let type_mismatch = || StorageError::TypeMismatch {
            column: column.name.clone(),
            expected: column.data_type,
            actual: value.type_name(),
        };

        match (column.data_type, value) {
            (_, Value::Null) if column.nullable => Ok(()),
            (_, Value::Null) => Err(StorageError::NullViolation {
                column: column.name.clone(),
            }),
            (DataType::Int, Value::Int(_)) | (DataType::Long, Value::Int(_) | Value::Long(_)) => {
                Ok(())
            }
            (DataType::Int, Value::Long(v)) => {
                if i32::try_from(*v).is_ok() {
                    Ok(())
                } else {
                    Err(StorageError::IntegerOutOfRange {
                        column: column.name.clone(),
                        value: *v,
                        data_type: column.data_type,
                    })
                }
            }
            (DataType::Char(capacity) | DataType::Varchar(capacity), Value::String(s)) => {
                if s.len() > capacity as usize {
                    Err(StorageError::ValueTooLong {
                        column: column.name.clone(),
                        length: s.len(),
                        capacity,
                    })
                } else if s.as_bytes().contains(&0) {
                    Err(StorageError::EmbeddedTerminator {
                        column: column.name.clone(),
                    })
                } else {
                    Ok(())
                }
            }
            _ => Err(type_mismatch()),
        }
    }
}
