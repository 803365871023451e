// tagbridge/src/transport/traits.rs

use crate::Result;
use std::time::Duration;

/// Byte-stream transport trait abstracting the serial link away from the
/// session and protocol logic, so a scripted double can stand in for the
/// reader chip in tests.
pub trait Transport {
    /// Write all bytes to the device.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes, blocking until at least one byte is
    /// available or `timeout` elapses. `Ok(0)` means the timeout expired
    /// with nothing received; it is never a spurious empty read.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Discard any bytes already buffered on the receive side.
    fn flush_input(&mut self) -> Result<()>;

    /// Close and reopen the underlying device handle. Called by the session's
    /// reconnection policy; the caller re-runs the initialization sequence.
    fn reopen(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    #[test]
    fn trait_object_write_read() {
        let mut m = MockTransport::new();
        m.push_read(vec![0x01, 0x02]);
        let mut t: &mut dyn Transport = &mut m;
        t.write_all(&[0x10]).unwrap();
        let mut buf = [0u8; 8];
        let n = t.read(&mut buf, Duration::from_millis(100)).unwrap();
        assert_eq!(&buf[..n], &[0x01, 0x02]);
        assert_eq!(m.sent, vec![vec![0x10]]);
    }
}
