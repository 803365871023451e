// tagbridge/src/transport/mod.rs

pub mod detect;
pub mod mock;
pub mod serial;
pub mod traits;

pub use detect::detect_reader;
pub use mock::MockTransport;
pub use serial::SerialTransport;
pub use traits::Transport;
