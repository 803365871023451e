// tagbridge/src/protocol/checksum.rs

/// Compute the Length Checksum (LCS) for a PN532 frame.
/// LCS = 0x100 - LEN (mod 256), where LEN counts the direction byte + payload.
pub fn lcs(len: u8) -> u8 {
    0u8.wrapping_sub(len)
}

/// Compute the Data Checksum (DCS) for a PN532 frame.
/// DCS = 0x100 - (TFI + sum(payload)) & 0xff
pub fn dcs(tfi: u8, payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(tfi, |acc, &b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}
