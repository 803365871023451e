// tagbridge/src/protocol/frame.rs

use crate::constants::{
    ACK_FRAME, MAX_PAYLOAD_LEN, MIN_FRAME_LEN, POSTAMBLE, PREAMBLE, TFI_HOST_TO_READER,
    TFI_READER_TO_HOST,
};
use crate::protocol::checksum::{dcs, lcs};
use crate::{Error, Result};

/// Direction of a frame on the wire, carried as the TFI byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HostToReader,
    ReaderToHost,
}

impl Direction {
    pub fn tfi(self) -> u8 {
        match self {
            Self::HostToReader => TFI_HOST_TO_READER,
            Self::ReaderToHost => TFI_READER_TO_HOST,
        }
    }

    pub fn from_tfi(tfi: u8) -> Result<Self> {
        match tfi {
            TFI_HOST_TO_READER => Ok(Self::HostToReader),
            TFI_READER_TO_HOST => Ok(Self::ReaderToHost),
            other => Err(Error::MalformedFrame(format!(
                "invalid direction byte {:#04x}",
                other
            ))),
        }
    }
}

/// PN532 information frame.
/// Format: [Preamble(3)] [LEN(1)] [LCS(1)] [TFI(1)] [Payload(n)] [DCS(1)] [Postamble(1)]
/// LEN counts TFI + payload; LCS and DCS are two's-complement checksums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub direction: Direction,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Build a host -> reader frame around a command payload.
    pub fn host(payload: Vec<u8>) -> Self {
        Self {
            direction: Direction::HostToReader,
            payload,
        }
    }

    /// Total number of bytes this frame occupies on the wire.
    pub fn wire_len(&self) -> usize {
        MIN_FRAME_LEN + self.payload.len()
    }

    /// Encode into a full wire frame.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLarge {
                max: MAX_PAYLOAD_LEN,
                actual: self.payload.len(),
            });
        }

        let tfi = self.direction.tfi();
        let len = (self.payload.len() + 1) as u8;
        let mut out = Vec::with_capacity(self.wire_len());
        out.extend_from_slice(&PREAMBLE);
        out.push(len);
        out.push(lcs(len));
        out.push(tfi);
        out.extend_from_slice(&self.payload);
        out.push(dcs(tfi, &self.payload));
        out.push(POSTAMBLE);
        Ok(out)
    }

    /// Decode one frame starting at `raw[0]`. Extra bytes after the
    /// postamble are ignored; callers advance by `wire_len()`.
    ///
    /// Returns `Truncated` when fewer bytes are available than the declared
    /// length requires, so a streaming caller can keep reading. Any marker or
    /// checksum mismatch is an error; a corrupt frame is never accepted.
    pub fn decode(raw: &[u8]) -> Result<Frame> {
        let prefix = raw.len().min(PREAMBLE.len());
        if raw[..prefix] != PREAMBLE[..prefix] {
            return Err(Error::MalformedFrame("invalid preamble".into()));
        }
        if raw.len() < 5 {
            return Err(Error::Truncated {
                needed: MIN_FRAME_LEN,
                available: raw.len(),
            });
        }

        let len = raw[3];
        if len == 0 {
            // LEN 0x00 / 0xFF is the ACK sentinel, not an information
            // frame; sessions match it with `is_ack` before decoding.
            return Err(Error::MalformedFrame("zero-length frame".into()));
        }
        let lcs_actual = raw[4];
        let lcs_expected = lcs(len);
        if lcs_actual != lcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: lcs_expected,
                actual: lcs_actual,
            });
        }

        let needed = 7 + len as usize;
        if raw.len() < needed {
            return Err(Error::Truncated {
                needed,
                available: raw.len(),
            });
        }

        let tfi = raw[5];
        let direction = Direction::from_tfi(tfi)?;
        let payload = &raw[6..6 + (len as usize - 1)];

        let dcs_actual = raw[5 + len as usize];
        let dcs_expected = dcs(tfi, payload);
        if dcs_actual != dcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: dcs_expected,
                actual: dcs_actual,
            });
        }
        if raw[6 + len as usize] != POSTAMBLE {
            return Err(Error::MalformedFrame("invalid postamble".into()));
        }

        Ok(Frame {
            direction,
            payload: payload.to_vec(),
        })
    }
}

/// True when `raw` begins with the fixed 6-byte acknowledgement frame.
pub fn is_ack(raw: &[u8]) -> bool {
    raw.len() >= ACK_FRAME.len() && raw[..ACK_FRAME.len()] == ACK_FRAME
}
