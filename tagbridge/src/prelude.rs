// tagbridge/src/prelude.rs

//! Common imports for bridge consumers.

pub use crate::config::Config;
pub use crate::dispatch::{
    DispatchOutcome, Dispatcher, EventSink, HttpSink, PayloadMode, RetryPolicy, TagEvent,
};
pub use crate::presence::PresenceTracker;
pub use crate::protocol::{Command, Frame, Response};
pub use crate::service::{register_stop_signals, Bridge, Health};
pub use crate::session::{Session, SessionState};
pub use crate::transport::{MockTransport, SerialTransport, Transport};
pub use crate::{CardKind, Error, PollResult, PresenceEvent, PresenceState, Result, Uid};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, default_read_timeout, ms};
