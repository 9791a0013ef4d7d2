//! Engine configuration structures.
//!
//! These structures define all configurable aspects of a Tessera engine.
//! They can be built in code or loaded from a TOML document:
//!
//! ```toml
//! [storage]
//! tuple_group_size = 256
//!
//! [executor]
//! implicit_transactions = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_STRING_LENGTH, DEFAULT_TUPLE_GROUP_SIZE};
use crate::error::ErrorCode;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::Resource,
            Self::Parse(_) | Self::Invalid { .. } => ErrorCode::InvalidArgument,
        }
    }
}

/// Main engine configuration.
///
/// # Example
///
/// ```rust
/// use tessera_common::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.storage.tuple_group_size, 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Table storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Statement execution configuration.
    #[serde(default)]
    pub executor: ExecutorConfig,
}

impl EngineConfig {
    /// Creates a minimal configuration for testing.
    ///
    /// Uses small tuple groups so growth paths are exercised with few rows.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            storage: StorageConfig {
                tuple_group_size: 4,
                ..Default::default()
            },
            executor: ExecutorConfig::default(),
        }
    }

    /// Parses and validates a configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.tuple_group_size == 0 {
            return Err(ConfigError::Invalid {
                message: "storage.tuple_group_size must be at least 1".to_string(),
            });
        }

        if self.storage.max_string_length == 0 {
            return Err(ConfigError::Invalid {
                message: "storage.max_string_length must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Table storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Number of tuple slots allocated per growth step.
    /// Default: 100
    #[serde(default = "default_tuple_group_size")]
    pub tuple_group_size: usize,

    /// Largest `n` accepted for `CHAR(n)` / `VARCHAR(n)` columns.
    /// Default: 65535
    #[serde(default = "default_max_string_length")]
    pub max_string_length: u32,
}

fn default_tuple_group_size() -> usize {
    DEFAULT_TUPLE_GROUP_SIZE
}

fn default_max_string_length() -> u32 {
    DEFAULT_MAX_STRING_LENGTH
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tuple_group_size: default_tuple_group_size(),
            max_string_length: default_max_string_length(),
        }
    }
}

/// Statement execution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Run data-modifying statements outside an explicit transaction inside
    /// an implicit one, so a statement that fails partway leaves no trace.
    /// Default: true
    #[serde(default = "default_implicit_transactions")]
    pub implicit_transactions: bool,
}

fn default_implicit_transactions() -> bool {
    true
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            implicit_transactions: default_implicit_transactions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.storage.tuple_group_size, 100);
        assert_eq!(config.storage.max_string_length, 65_535);
        assert!(config.executor.implicit_transactions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            [storage]
            tuple_group_size = 8
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.storage.tuple_group_size, 8);
        assert_eq!(config.storage.max_string_length, 65_535);
        assert!(config.executor.implicit_transactions);
    }

    #[test]
    fn test_parse_empty_toml() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_reject_zero_group_size() {
        let err = EngineConfig::from_toml_str("[storage]\ntuple_group_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_reject_malformed_toml() {
        let err = EngineConfig::from_toml_str("[storage\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tessera.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[executor]\nimplicit_transactions = false").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(!config.executor.implicit_transactions);
        assert_eq!(config.storage.tuple_group_size, 100);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = EngineConfig::for_testing();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
