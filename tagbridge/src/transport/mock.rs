// tagbridge/src/transport/mock.rs

use crate::transport::traits::Transport;
use crate::{Error, Result};
use std::collections::VecDeque;
use std::time::Duration;

/// Scripted byte-stream double for unit and integration tests. Records
/// written bytes and plays back queued read chunks; an empty queue behaves
/// like a read timeout.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Every write, in order.
    pub sent: Vec<Vec<u8>>,
    /// Chunks returned by subsequent reads, front first.
    pub reads: VecDeque<Vec<u8>>,
    /// Number of upcoming writes that should fail with an I/O error.
    pub write_failures: usize,
    /// Times `reopen` was called.
    pub reopen_count: usize,
    /// Times `flush_input` was called.
    pub flush_count: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one read chunk. Each chunk is handed out by at most one read
    /// call (oversized chunks are carried over to the next call).
    pub fn push_read(&mut self, chunk: Vec<u8>) {
        self.reads.push_back(chunk);
    }

    /// Make the next `n` writes fail with a broken-pipe I/O error.
    pub fn fail_writes(&mut self, n: usize) {
        self.write_failures = n;
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if self.write_failures > 0 {
            self.write_failures -= 1;
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted write failure",
            )));
        }
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        match self.reads.pop_front() {
            None => Ok(0),
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.reads.push_front(chunk[n..].to_vec());
                }
                Ok(n)
            }
        }
    }

    fn flush_input(&mut self) -> Result<()> {
        // Only bytes already "on the wire" would be discarded on hardware;
        // queued chunks model future traffic, so they stay.
        self.flush_count += 1;
        Ok(())
    }

    fn reopen(&mut self) -> Result<()> {
        self.reopen_count += 1;
        Ok(())
    }
}
