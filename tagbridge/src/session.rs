// tagbridge/src/session.rs
//! Transport session: one command/response exchange at a time over the
//! serial link, with explicit ack/response phases and the serial
//! reconnection policy. This is the only place reconnect logic lives.

use crate::constants::{
    ACK_FRAME, PREAMBLE, TAG_BLOCKS_PER_READ, TAG_CC_BLOCK, TAG_DATA_BLOCK_END,
    TAG_DATA_BLOCK_START, WAKEUP_PREAMBLE,
};
use crate::protocol::frame::{is_ack, Direction};
use crate::protocol::{Command, Frame, Response};
use crate::transport::Transport;
use crate::types::PollResult;
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};
use std::time::{Duration, Instant};

/// Exchange phase. The session is `Idle` between commands; `AwaitingAck`
/// after a command frame is written; `AwaitingResponse` once the chip has
/// acknowledged it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingAck,
    AwaitingResponse,
}

/// Consecutive transport failures tolerated before the serial handle is
/// closed, reopened and re-initialized.
const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Read chunk size for the receive buffer.
const READ_CHUNK: usize = 256;

/// Owns the serial connection and drives the chip's command/ack/response
/// cycle with per-call timeouts.
pub struct Session {
    transport: Box<dyn Transport>,
    state: SessionState,
    buffer: Vec<u8>,
    timeout: Duration,
    consecutive_failures: u32,
    reconnecting: bool,
}

impl Session {
    /// Create a session over an open transport. `timeout` bounds each ack
    /// and response wait individually.
    pub fn new(transport: Box<dyn Transport>, timeout: Duration) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
            buffer: Vec::new(),
            timeout,
            consecutive_failures: 0,
            reconnecting: false,
        }
    }

    /// Current exchange phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Wake the chip and bring it to an operational state: HSU wakeup
    /// preamble, SAM configuration, firmware sanity check, and a MaxRetries
    /// setting so presence polls answer promptly with zero targets.
    pub fn initialize(&mut self) -> Result<()> {
        self.buffer.clear();
        self.transport.flush_input()?;
        self.transport.write_all(&WAKEUP_PREAMBLE)?;

        self.send_command(&Command::sam_normal(), self.timeout)?;

        match self.send_command(&Command::GetFirmwareVersion, self.timeout)? {
            Response::FirmwareVersion { ic, version, revision, .. } => {
                log::info!(
                    "reader ready: ic={:#04x} firmware {}.{}",
                    ic,
                    version,
                    revision
                );
            }
            other => {
                return Err(Error::MalformedFrame(format!(
                    "unexpected firmware response: {:?}",
                    other
                )));
            }
        }

        self.send_command(&Command::rf_max_retries_single_shot(), self.timeout)?;
        Ok(())
    }

    /// Write one command frame and run the ack/response cycle. Failing the
    /// ack wait yields `AckTimeout`; failing the response wait yields
    /// `ResponseTimeout`. Transport failures feed the reconnection policy.
    pub fn send_command(&mut self, cmd: &Command, timeout: Duration) -> Result<Response> {
        let result = self.exchange(cmd, timeout);
        self.state = SessionState::Idle;
        match &result {
            Ok(_) => self.consecutive_failures = 0,
            Err(e) if e.is_transport_failure() => self.note_transport_failure(),
            Err(_) => {}
        }
        result
    }

    /// Issue the chip's list-targets command and classify the answer.
    /// Zero targets means no card in field; with several cards answering,
    /// the first-listed target wins (single-card workflows only).
    pub fn poll_presence(&mut self) -> Result<PollResult> {
        let response = self.send_command(&Command::list_one_type_a(), self.timeout)?;
        let Response::TargetList { targets } = response else {
            return Err(Error::UnexpectedResponse {
                expected: 0x4B,
                actual: 0x00,
            });
        };
        if targets.len() > 1 {
            log::debug!("{} targets in field, keeping the first listed", targets.len());
        }
        match targets.into_iter().next() {
            None => Ok(PollResult::Absent),
            Some(target) => {
                log::debug!("target: uid={} type={}", target.uid, target.kind());
                Ok(PollResult::Present(target.uid))
            }
        }
    }

    /// Dump the tag's NDEF area: capability container (block 3) first, then
    /// blocks 4..48 in 4-block reads with one retry each. `Ok(None)` means
    /// the tag refused the reads (blank or foreign format) - not an error.
    pub fn read_tag_memory(&mut self) -> Result<Option<Vec<u8>>> {
        let timeout = crate::utils::ms(crate::utils::MEMORY_READ_TIMEOUT_MS);

        match self.read_block(TAG_CC_BLOCK, timeout) {
            Ok(_cc) => {}
            Err(Error::ExchangeStatus { code }) => {
                log::debug!("capability container read refused (status {:#04x})", code);
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        let mut memory = Vec::with_capacity(176);
        let mut block = TAG_DATA_BLOCK_START;
        while block < TAG_DATA_BLOCK_END {
            match self.read_block_with_retry(block, timeout) {
                Ok(data) => memory.extend_from_slice(&data),
                Err(Error::ExchangeStatus { code }) => {
                    // Later blocks are not critical once a plausible message
                    // is already in hand; early blocks are.
                    if block > TAG_DATA_BLOCK_START + 16 && memory.len() > 50 {
                        log::debug!(
                            "stopping dump at block {} (status {:#04x}), {} bytes collected",
                            block,
                            code,
                            memory.len()
                        );
                        break;
                    }
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
            block += TAG_BLOCKS_PER_READ;
        }
        Ok(Some(memory))
    }

    fn read_block(&mut self, block: u8, timeout: Duration) -> Result<Vec<u8>> {
        match self.send_command(&Command::read_block(block), timeout)? {
            Response::DataExchange { data } => Ok(data),
            _ => Err(Error::UnexpectedResponse {
                expected: 0x41,
                actual: 0x00,
            }),
        }
    }

    fn read_block_with_retry(&mut self, block: u8, timeout: Duration) -> Result<Vec<u8>> {
        match self.read_block(block, timeout) {
            Ok(data) => Ok(data),
            Err(first) => {
                log::debug!("retrying block {} after: {}", block, first);
                self.read_block(block, timeout)
            }
        }
    }

    fn exchange(&mut self, cmd: &Command, timeout: Duration) -> Result<Response> {
        self.buffer.clear();
        self.transport.flush_input()?;

        let wire = Frame::host(cmd.encode()).encode()?;
        log::trace!("-> {}", bytes_to_hex_spaced(&wire));
        self.transport.write_all(&wire)?;
        self.state = SessionState::AwaitingAck;

        self.read_ack(timeout)?;
        self.state = SessionState::AwaitingResponse;

        let frame = self.read_frame(timeout)?;
        if frame.direction != Direction::ReaderToHost {
            return Err(Error::MalformedFrame(
                "host-direction frame received from reader".into(),
            ));
        }
        Response::decode(cmd.command_code(), &frame.payload)
    }

    fn read_ack(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(pos) = find_subsequence(&self.buffer, &ACK_FRAME) {
                self.buffer.drain(..pos + ACK_FRAME.len());
                return Ok(());
            }
            if !self.fill_buffer(deadline)? {
                return Err(Error::AckTimeout);
            }
        }
    }

    fn read_frame(&mut self, timeout: Duration) -> Result<Frame> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(pos) = find_subsequence(&self.buffer, &PREAMBLE) {
                // A stray ack here would decode as a zero-length frame; skip it.
                if is_ack(&self.buffer[pos..]) {
                    self.buffer.drain(..pos + ACK_FRAME.len());
                    continue;
                }
                match Frame::decode(&self.buffer[pos..]) {
                    Ok(frame) => {
                        log::trace!("<- {}", bytes_to_hex_spaced(&frame.payload));
                        self.buffer.drain(..pos + frame.wire_len());
                        return Ok(frame);
                    }
                    Err(Error::Truncated { .. }) => {
                        // Keep reading until the declared length arrives.
                    }
                    Err(e) => {
                        // Corrupt frame from the untrusted device: drop past
                        // this preamble so a retry does not re-parse it.
                        self.buffer.drain(..pos + 1);
                        return Err(e);
                    }
                }
            } else if self.buffer.len() > PREAMBLE.len() {
                // Line noise; keep only a possible partial preamble tail.
                let tail = self.buffer.split_off(self.buffer.len() - 2);
                self.buffer = tail;
            }
            if !self.fill_buffer(deadline)? {
                return Err(Error::ResponseTimeout);
            }
        }
    }

    /// Read more bytes into the buffer. Returns false once the deadline has
    /// passed (or the per-call read timed out with nothing received).
    fn fill_buffer(&mut self, deadline: Instant) -> Result<bool> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }
        let mut chunk = [0u8; READ_CHUNK];
        let n = self.transport.read(&mut chunk, remaining)?;
        if n == 0 {
            return Ok(false);
        }
        self.buffer.extend_from_slice(&chunk[..n]);
        Ok(true)
    }

    fn note_transport_failure(&mut self) {
        if self.reconnecting {
            return;
        }
        self.consecutive_failures += 1;
        if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
            self.reconnect();
        }
    }

    /// Close and reopen the serial handle, then re-run the initialization
    /// sequence. Failures are logged, not propagated: the caller already
    /// holds the operation error, and the next poll retries from scratch.
    fn reconnect(&mut self) {
        log::warn!(
            "{} consecutive transport failures, reopening serial device",
            self.consecutive_failures
        );
        self.reconnecting = true;
        let result = self.transport.reopen().and_then(|_| self.initialize());
        self.reconnecting = false;
        self.consecutive_failures = 0;
        match result {
            Ok(()) => log::info!("serial device reopened"),
            Err(e) => log::warn!("reconnect failed: {}", e),
        }
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
