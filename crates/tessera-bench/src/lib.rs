//! Tessera performance benchmarks.
//!
//! - Table store insert, scan and delete/reuse
//! - Statement planning and execution through the engine
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p tessera-bench
//! ```

pub mod utils;
