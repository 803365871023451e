// tagbridge/src/lib.rs

//! tagbridge
//!
//! Bridges a PN532 NFC reader on a serial port to Home Assistant: polls for
//! card presence, reads NDEF content, and fires `tag_scanned` events.
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod ndef;
pub mod prelude;
pub mod presence;
pub mod protocol;
pub mod service;
pub mod session;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
