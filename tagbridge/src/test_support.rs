// tagbridge/src/test_support.rs
//! Test support helpers intended for use by unit and integration tests.
//!
//! Centralizes frame fixtures and MockTransport seeding so tests across the
//! crate and tests/ directory build the same wire traffic.
#![allow(dead_code)]

use crate::dispatch::{EventSink, TagEvent};
use crate::transport::mock::MockTransport;
use crate::transport::traits::Transport;
use crate::utils::Sleeper;
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Transport handle that shares one [`MockTransport`] with the test body,
/// so the test can keep inspecting `sent` and queueing reads after the
/// session has taken ownership of its end.
#[doc(hidden)]
pub struct SharedTransport {
    inner: Rc<RefCell<MockTransport>>,
}

impl SharedTransport {
    pub fn new(inner: Rc<RefCell<MockTransport>>) -> Self {
        Self { inner }
    }
}

impl Transport for SharedTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.inner.borrow_mut().write_all(data)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.inner.borrow_mut().read(buf, timeout)
    }

    fn flush_input(&mut self) -> Result<()> {
        self.inner.borrow_mut().flush_input()
    }

    fn reopen(&mut self) -> Result<()> {
        self.inner.borrow_mut().reopen()
    }
}

/// Event sink double scripted with per-attempt HTTP statuses. Posted events
/// are shared with the test body through an `Rc`.
#[doc(hidden)]
#[derive(Default)]
pub struct ScriptedSink {
    pub posted: Rc<RefCell<Vec<TagEvent>>>,
    pub statuses: VecDeque<u16>,
}

impl ScriptedSink {
    /// Each delivery attempt consumes one status; an exhausted script
    /// answers 200.
    pub fn with_statuses(statuses: &[u16]) -> Self {
        Self {
            posted: Rc::new(RefCell::new(Vec::new())),
            statuses: statuses.iter().copied().collect(),
        }
    }
}

impl EventSink for ScriptedSink {
    fn post(&mut self, event: &TagEvent) -> Result<()> {
        self.posted.borrow_mut().push(event.clone());
        let status = self.statuses.pop_front().unwrap_or(200);
        match status {
            200..=299 => Ok(()),
            401 | 403 => Err(Error::AuthRejected { status }),
            _ => Err(Error::DeliveryStatus { status }),
        }
    }
}

/// Sleeper double that records requested delays instead of sleeping.
#[doc(hidden)]
#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: Rc<RefCell<Vec<Duration>>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Wire-level fixtures: acknowledgement and response frames, target-list
/// payloads, and full tag memory images.
#[doc(hidden)]
pub mod fixtures {
    use super::MockTransport;
    use crate::constants::ACK_FRAME;
    use crate::protocol::frame::{Direction, Frame};

    /// The fixed 6-byte acknowledgement frame.
    pub fn ack() -> Vec<u8> {
        ACK_FRAME.to_vec()
    }

    /// A reader-to-host information frame around `payload`, encoded to wire
    /// bytes. Panics on oversized payloads; fixtures stay small.
    pub fn response_frame(payload: &[u8]) -> Vec<u8> {
        let frame = Frame {
            direction: Direction::ReaderToHost,
            payload: payload.to_vec(),
        };
        frame.encode().unwrap()
    }

    /// Payload of a list-targets response carrying the given identifiers,
    /// one Type A entry per identifier (SENS_RES 00 44, SEL_RES 00).
    pub fn target_list_payload(uids: &[&[u8]]) -> Vec<u8> {
        let mut payload = vec![0x4B, uids.len() as u8];
        for (i, uid) in uids.iter().enumerate() {
            payload.push(i as u8 + 1);
            payload.extend_from_slice(&[0x00, 0x44]);
            payload.push(0x00);
            payload.push(uid.len() as u8);
            payload.extend_from_slice(uid);
        }
        payload
    }

    /// Seed one ack + response pair for a command exchange.
    pub fn seed_exchange(mock: &mut MockTransport, payload: &[u8]) {
        mock.push_read(ack());
        mock.push_read(response_frame(payload));
    }

    /// Seed the three exchanges of the initialization sequence: SAM
    /// configuration, firmware version, RF retry configuration.
    pub fn seed_init(mock: &mut MockTransport) {
        seed_exchange(mock, &[0x15]);
        seed_exchange(mock, &[0x03, 0x32, 0x01, 0x06, 0x07]);
        seed_exchange(mock, &[0x33]);
    }

    /// Seed a presence poll that answers with zero targets.
    pub fn seed_poll_absent(mock: &mut MockTransport) {
        seed_exchange(mock, &[0x4B, 0x00]);
    }

    /// Seed a presence poll that answers with one target carrying `uid`.
    pub fn seed_poll_present(mock: &mut MockTransport, uid: &[u8]) {
        let payload = target_list_payload(&[uid]);
        seed_exchange(mock, &payload);
    }

    /// Seed the full memory dump: the capability container read, then the
    /// data area handed out 16 bytes per exchange. `memory` must be the
    /// 176-byte data area image.
    pub fn seed_memory_read(mock: &mut MockTransport, memory: &[u8]) {
        assert_eq!(memory.len(), 176, "data area image must cover blocks 4..48");
        let mut cc = vec![0x41, 0x00, 0xE1, 0x10, 0x12, 0x00];
        cc.resize(2 + 16, 0x00);
        mock.push_read(ack());
        mock.push_read(response_frame(&cc));
        for chunk in memory.chunks(16) {
            let mut payload = vec![0x41, 0x00];
            payload.extend_from_slice(chunk);
            seed_exchange(mock, &payload);
        }
    }

    /// 176-byte data area holding one NDEF message with a single short text
    /// record (language "en"), terminated and zero padded.
    pub fn ndef_text_memory(text: &str) -> Vec<u8> {
        let mut record = vec![0xD1, 0x01];
        record.push((3 + text.len()) as u8);
        record.push(0x54);
        record.push(0x02);
        record.extend_from_slice(b"en");
        record.extend_from_slice(text.as_bytes());
        wrap_ndef_message(&record)
    }

    /// 176-byte data area holding one NDEF message with a single short URI
    /// record using the given prefix code.
    pub fn ndef_uri_memory(prefix_code: u8, rest: &str) -> Vec<u8> {
        let mut record = vec![0xD1, 0x01];
        record.push((1 + rest.len()) as u8);
        record.push(0x55);
        record.push(prefix_code);
        record.extend_from_slice(rest.as_bytes());
        wrap_ndef_message(&record)
    }

    /// Wrap a raw record in the NDEF message TLV, add the terminator, and
    /// pad with zeros to the 176-byte data area size.
    pub fn wrap_ndef_message(record: &[u8]) -> Vec<u8> {
        assert!(record.len() < 0xFF, "fixture records use the short TLV length");
        let mut memory = vec![0x03, record.len() as u8];
        memory.extend_from_slice(record);
        memory.push(0xFE);
        memory.resize(176, 0x00);
        memory
    }
}
