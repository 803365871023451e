// tagbridge/src/types.rs

use crate::Error;

/// Hardware card identifier (NFCID1), 4 to 10 bytes.
///
/// A `Uid` only lives for as long as the card stays in range; it is compared
/// for equality against the previously seen identifier and rendered as hex
/// for uuid-mode events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(Vec<u8>);

impl Uid {
    /// Minimum NFCID1 length for the supported card family.
    pub const MIN_LEN: usize = 4;
    /// Maximum NFCID1 length.
    pub const MAX_LEN: usize = 10;

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Fixed-width lower-case hex rendering used as the uuid-mode tag id.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.0)
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < Self::MIN_LEN || bytes.len() > Self::MAX_LEN {
            return Err(Error::InvalidLength {
                expected: Self::MIN_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes.to_vec()))
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Card family derived from the SEL_RES (SAK) byte of a detected target.
/// Only used for logging; the bridge never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    MifareUltralight,
    MifareClassic1k,
    MifareClassic4k,
    MifareDesfire,
    MifarePlus,
    Unknown(u8),
}

impl CardKind {
    pub fn from_sel_res(sel_res: u8) -> Self {
        match sel_res {
            0x00 => Self::MifareUltralight,
            0x08 => Self::MifareClassic1k,
            0x18 => Self::MifareClassic4k,
            0x20 => Self::MifareDesfire,
            0x44 => Self::MifarePlus,
            other => Self::Unknown(other),
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MifareUltralight => write!(f, "MIFARE Ultralight"),
            Self::MifareClassic1k => write!(f, "MIFARE Classic 1K"),
            Self::MifareClassic4k => write!(f, "MIFARE Classic 4K"),
            Self::MifareDesfire => write!(f, "MIFARE DESFire"),
            Self::MifarePlus => write!(f, "MIFARE Plus"),
            Self::Unknown(sak) => write!(f, "Unknown (SAK: {:#04x})", sak),
        }
    }
}

/// Result of one presence poll, as seen by the presence tracker. Carries the
/// poll outcome only; transport failures are surfaced as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    Absent,
    Present(Uid),
}

/// Card presence as tracked across poll cycles. Owned by the orchestrator
/// loop and mutated once per cycle, never concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresenceState {
    #[default]
    Absent,
    Present(Uid),
}

/// Discrete event produced by the presence reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    Detected(Uid),
    Removed,
}
