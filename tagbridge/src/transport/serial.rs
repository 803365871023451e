// tagbridge/src/transport/serial.rs

use crate::transport::traits::Transport;
use crate::Result;
use std::io::Read;
use std::time::Duration;

/// Serial transport backed by the `serialport` crate. Owns the open port and
/// remembers the path/baud so the session's reconnection policy can reopen
/// the same device.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    path: String,
    baud_rate: u32,
}

impl SerialTransport {
    /// Open `path` at `baud_rate`. The per-call read timeout is set before
    /// every read, so the initial value here is only a placeholder.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(crate::utils::default_read_timeout())
            .open()?;
        Ok(Self {
            port,
            path: path.to_string(),
            baud_rate,
        })
    }

    /// Device path this transport is bound to.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        std::io::Write::write_all(&mut self.port, data)?;
        self.port.flush()?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        // serialport enforces a minimum timeout of 1ms on some platforms;
        // never pass zero.
        self.port.set_timeout(timeout.max(Duration::from_millis(1)))?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }

    fn reopen(&mut self) -> Result<()> {
        let port = serialport::new(self.path.as_str(), self.baud_rate)
            .timeout(crate::utils::default_read_timeout())
            .open()?;
        self.port = port;
        Ok(())
    }
}
