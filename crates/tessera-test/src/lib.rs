//! # tessera-test
//!
//! Integration tests for Tessera.
//!
//! This crate contains:
//! - End-to-end statement scenarios (`tests/`)
//! - Shared fixtures for building engines and statements

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Test utilities and helpers
pub mod utils;
