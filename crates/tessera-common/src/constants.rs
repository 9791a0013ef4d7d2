//! System-wide constants for Tessera.

// =============================================================================
// Tuple Storage Constants
// =============================================================================

/// Number of tuple slots allocated together when a table store grows.
///
/// Each group is one contiguous allocation released when the store is dropped.
pub const DEFAULT_TUPLE_GROUP_SIZE: usize = 100;

/// Storage width of an `INT` column in bytes.
pub const INT_WIDTH: usize = 4;

/// Storage width of a `LONG` column in bytes.
pub const LONG_WIDTH: usize = 8;

/// Bytes appended to every `CHAR(n)` / `VARCHAR(n)` column for the terminator.
pub const STRING_TERMINATOR_WIDTH: usize = 1;

/// Byte written after the value bytes of a string column.
pub const STRING_TERMINATOR: u8 = 0;

/// Width of one null-map entry in bytes. The null map holds one entry per column.
pub const NULL_FLAG_WIDTH: usize = 1;

// =============================================================================
// Limits
// =============================================================================

/// Default upper bound on `n` in `CHAR(n)` / `VARCHAR(n)`.
pub const DEFAULT_MAX_STRING_LENGTH: u32 = 65_535;

/// Maximum number of columns in a table.
pub const MAX_COLUMNS: usize = 1024;

// =============================================================================
// Naming
// =============================================================================

/// Separator used when rendering a qualified table name (`schema/name`).
pub const QUALIFIED_NAME_SEPARATOR: char = '/';
