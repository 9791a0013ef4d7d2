//! Core data types for Tessera.
//!
//! - [`DataType`]: declared column types and their fixed storage widths
//! - [`Value`]: a single runtime value
//! - [`Row`]: an ordered sequence of values
//! - [`ColumnDef`]: a column's name, type and nullability

mod column;
mod data_type;
mod row;
mod value;

pub use column::ColumnDef;
pub use data_type::DataType;
pub use row::Row;
pub use value::Value;
