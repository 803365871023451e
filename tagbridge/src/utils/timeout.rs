// tagbridge/src/utils/timeout.rs
//! Timeout helpers shared by the transport and session layers.

use std::time::Duration;

/// Default per-call read timeout in milliseconds used when the configuration
/// does not provide one.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 500;

/// Timeout applied to tag memory reads, which take longer than a presence
/// poll because the chip relays MIFARE READ exchanges.
pub const MEMORY_READ_TIMEOUT_MS: u64 = 1000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Convenience: default read timeout as Duration.
pub fn default_read_timeout() -> Duration {
    ms(DEFAULT_READ_TIMEOUT_MS)
}

/// Seam for everything that waits on wall-clock time (poll pacing, retry
/// backoff), so tests can record requested delays instead of sleeping.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Production sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
