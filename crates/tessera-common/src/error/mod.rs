//! Error classification for Tessera.
//!
//! Each layer owns its own error enum; all of them report one of the
//! stable [`ErrorCode`] values from `code()`.

mod code;

pub use code::ErrorCode;
