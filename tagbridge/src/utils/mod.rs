// tagbridge/src/utils/mod.rs
//! Small, reusable helpers used across the crate: hex rendering for log and
//! event output, and timeout defaults shared by transport and session code.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
