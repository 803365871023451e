// tagbridge/src/error.rs

use thiserror::Error;

/// Crate-wide error type.
///
/// Anything originating from the untrusted reader or the network is
/// recoverable by design; only configuration/credential problems and
/// unrecoverable device loss are allowed to end the process.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no NFC reader device found")]
    DeviceNotFound,

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("serial i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload too large: {actual} bytes exceeds frame maximum of {max}")]
    PayloadTooLarge { max: usize, actual: usize },

    #[error("truncated frame: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unexpected response code: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse { expected: u8, actual: u8 },

    #[error("reader reported status {code:#04x} for data exchange")]
    ExchangeStatus { code: u8 },

    #[error("timed out waiting for acknowledgement")]
    AckTimeout,

    #[error("timed out waiting for response frame")]
    ResponseTimeout,

    #[error("event delivery failed: {0}")]
    Delivery(String),

    #[error("event endpoint returned status {status}")]
    DeliveryStatus { status: u16 },

    #[error("authorization rejected by event endpoint (status {status}): check the access token")]
    AuthRejected { status: u16 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures that should feed the transport session's
    /// consecutive-failure counter (ack/response timeout, serial I/O).
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Error::AckTimeout | Error::ResponseTimeout | Error::Serial(_) | Error::Io(_)
        )
    }

    /// True for delivery failures worth retrying with backoff. Credential
    /// rejections are configuration problems and are never retried.
    pub fn is_retryable_delivery(&self) -> bool {
        matches!(self, Error::Delivery(_) | Error::DeliveryStatus { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
