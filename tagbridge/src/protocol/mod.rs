// tagbridge/src/protocol/mod.rs

pub mod checksum;
pub mod commands;
pub mod frame;
pub mod parser;
pub mod responses;

pub use checksum::{dcs, lcs};
pub use commands::Command;
pub use frame::{Direction, Frame};
pub use responses::{Response, Target};
