//! Stable error codes.

use std::fmt;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Internal error (bug).
    Internal = 0x0001,
    /// Statement shape, type, or predicate that cannot be lowered.
    Unsupported = 0x0002,
    /// Input-contract violation.
    InvalidArgument = 0x0003,

    // Catalog errors (0x0100 - 0x01FF)
    /// Schema, table, index, or column does not exist.
    NotFound = 0x0100,
    /// Create target already exists.
    AlreadyExists = 0x0101,

    // Storage errors (0x0200 - 0x02FF)
    /// Value does not fit its column.
    Capacity = 0x0200,
    /// Memory for tuple storage could not be obtained.
    Resource = 0x0201,

    // Transaction errors (0x0300 - 0x03FF)
    /// Transaction state violation.
    Transaction = 0x0300,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Catalog",
            0x02 => "Storage",
            0x03 => "Transaction",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
