//! Column value encoding.
//!
//! Integers are stored as fixed-width little-endian. Strings are stored as
//! their bytes followed by a terminator; the rest of the column range is
//! zeroed. Values must have been checked by [`TupleLayout`] first.
//!
//! [`TupleLayout`]: crate::layout::TupleLayout

use tessera_common::constants::STRING_TERMINATOR;
use tessera_common::{DataType, Value};

use crate::arena::TupleId;
use crate::error::{StorageError, StorageResult};

const NULL_FLAG_SET: u8 = 1;
const NULL_FLAG_CLEAR: u8 = 0;

/// Writes `value` into the column's null flag and value bytes.
pub(crate) fn encode_column(data_type: DataType, value: &Value, null_flag: &mut u8, dst: &mut [u8]) {
    match value {
        Value::Null => {
            *null_flag = NULL_FLAG_SET;
            dst.fill(0);
        }
        Value::Int(v) => {
            *null_flag = NULL_FLAG_CLEAR;
            encode_integer(data_type, i64::from(*v), dst);
        }
        Value::Long(v) => {
            *null_flag = NULL_FLAG_CLEAR;
            encode_integer(data_type, *v, dst);
        }
        Value::String(s) => {
            *null_flag = NULL_FLAG_CLEAR;
            let bytes = s.as_bytes();
            dst[..bytes.len()].copy_from_slice(bytes);
            dst[bytes.len()..].fill(STRING_TERMINATOR);
        }
    }
}

fn encode_integer(data_type: DataType, v: i64, dst: &mut [u8]) {
    match data_type {
        // Range was checked during validation
        DataType::Int => dst.copy_from_slice(&(v as i32).to_le_bytes()),
        _ => dst.copy_from_slice(&v.to_le_bytes()),
    }
}

/// Reads a column value back from its null flag and value bytes.
pub(crate) fn decode_column(
    tuple: TupleId,
    data_type: DataType,
    null_flag: u8,
    src: &[u8],
) -> StorageResult<Value> {
    if null_flag != NULL_FLAG_CLEAR {
        return Ok(Value::Null);
    }

    let corrupted = |reason: String| StorageError::Corrupted { tuple, reason };
    match data_type {
        DataType::Int => {
            let bytes: [u8; 4] = src
                .try_into()
                .map_err(|_| corrupted(format!("INT column spans {} bytes", src.len())))?;
            Ok(Value::Int(i32::from_le_bytes(bytes)))
        }
        DataType::Long => {
            let bytes: [u8; 8] = src
                .try_into()
                .map_err(|_| corrupted(format!("LONG column spans {} bytes", src.len())))?;
            Ok(Value::Long(i64::from_le_bytes(bytes)))
        }
        DataType::Char(_) | DataType::Varchar(_) => {
            let end = src
                .iter()
                .position(|&b| b == STRING_TERMINATOR)
                .ok_or_else(|| corrupted("string column has no terminator".to_string()))?;
            let s = std::str::from_utf8(&src[..end])
                .map_err(|e| corrupted(format!("string column is not UTF-8: {}", e)))?;
            Ok(Value::String(s.to_string()))
        }
    }
}
