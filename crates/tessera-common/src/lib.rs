//! # tessera-common
//!
//! Common types, errors, and configuration for Tessera.
//!
//! This crate provides the foundational pieces shared by every Tessera
//! component:
//!
//! - **Types**: column types (`DataType`), runtime values (`Value`), decoded
//!   rows (`Row`) and column definitions (`ColumnDef`)
//! - **Errors**: the stable `ErrorCode` classification reported by every
//!   layer's error type
//! - **Config**: engine configuration with TOML loading
//! - **Constants**: system-wide constants and limits
//!
//! ## Example
//!
//! ```rust
//! use tessera_common::types::{ColumnDef, DataType, Row, Value};
//!
//! let column = ColumnDef::new("name", DataType::Varchar(16));
//! assert_eq!(column.data_type.storage_width(), 17);
//!
//! let row = Row::new(vec![Value::Int(1), Value::from("alice")]);
//! assert_eq!(row.to_string(), "(1, alice)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::{ConfigError, EngineConfig, ExecutorConfig, StorageConfig};
pub use constants::*;
pub use error::ErrorCode;
pub use types::{ColumnDef, DataType, Row, Value};
