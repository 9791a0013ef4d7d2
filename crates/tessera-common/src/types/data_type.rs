//! Declared column types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{INT_WIDTH, LONG_WIDTH, STRING_TERMINATOR_WIDTH};

/// Column data type.
///
/// Every type has a fixed storage width, so a table's tuple size is known
/// as soon as its columns are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Fixed-length character string of at most `n` bytes.
    Char(u32),
    /// Variable-length character string of at most `n` bytes.
    Varchar(u32),
}

impl DataType {
    /// Returns the number of bytes a value of this type occupies in a tuple.
    ///
    /// String types reserve one extra byte for the terminator.
    #[must_use]
    pub const fn storage_width(&self) -> usize {
        match self {
            DataType::Int => INT_WIDTH,
            DataType::Long => LONG_WIDTH,
            DataType::Char(n) | DataType::Varchar(n) => *n as usize + STRING_TERMINATOR_WIDTH,
        }
    }

    /// Returns the declared length of a string type.
    #[must_use]
    pub const fn string_capacity(&self) -> Option<u32> {
        match self {
            DataType::Char(n) | DataType::Varchar(n) => Some(*n),
            DataType::Int | DataType::Long => None,
        }
    }

    /// Returns the SQL keyword for this type without its length.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Char(_) => "CHAR",
            DataType::Varchar(_) => "VARCHAR",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int | DataType::Long => write!(f, "{}", self.keyword()),
            DataType::Char(n) | DataType::Varchar(n) => write!(f, "{}({})", self.keyword(), n),
        }
    }
}
