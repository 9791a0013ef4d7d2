//! Configuration for Tessera.
//!
//! This module provides configuration structures for the engine components.

mod engine;

pub use engine::{ConfigError, EngineConfig, ExecutorConfig, StorageConfig};
