// tagbridge/src/protocol/parser.rs

use crate::types::Uid;
use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    ensure_len(data, idx + 1)?;
    Ok(data[idx])
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    ensure_len(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

/// Parse a length-prefixed Uid at `idx` (length byte followed by that many
/// identifier bytes). Returns the Uid and the index one past it.
pub fn uid_at(data: &[u8], idx: usize) -> Result<(Uid, usize)> {
    let len = byte_at(data, idx)? as usize;
    let bytes = slice_at(data, idx + 1, len)?;
    let uid = Uid::try_from(bytes)?;
    Ok((uid, idx + 1 + len))
}

/// Ensure the first byte (response code) equals `expected`. Returns
/// `UnexpectedResponse` on mismatch, `InvalidLength` on an empty slice.
pub fn expect_response_code(data: &[u8], expected: u8) -> Result<()> {
    let actual = byte_at(data, 0)?;
    if actual != expected {
        return Err(Error::UnexpectedResponse { expected, actual });
    }
    Ok(())
}
