// tagbridge/src/ndef/mod.rs
//! NDEF extraction from a Type 2 tag data area.
//!
//! Tag memory is untrusted input: every anomaly (bad TLV lengths, chunked
//! records, undecodable text) yields `None` rather than an error, since a
//! half-written or foreign tag is an expected condition, not a fault.

pub mod record;
pub mod uri;

pub use record::Record;

const TLV_NULL: u8 = 0x00;
const TLV_NDEF_MESSAGE: u8 = 0x03;
const TLV_TERMINATOR: u8 = 0xFE;

/// Walk the TLV area and return the first record content a tag automation
/// can use: an expanded URI (with the tag-registry URL unwrapped to its
/// identifier) or the text of a text record.
pub fn extract_tag_content(memory: &[u8]) -> Option<String> {
    let message = find_message(memory)?;
    record::records(message).find_map(|r| r.content())
}

/// Locate the first NDEF message TLV and return its value bytes. Null TLVs
/// are skipped byte-wise; every other TLV type is skipped by its declared
/// length; the terminator ends the walk.
fn find_message(memory: &[u8]) -> Option<&[u8]> {
    let mut i = 0;
    while i < memory.len() {
        match memory[i] {
            TLV_NULL => i += 1,
            TLV_TERMINATOR => return None,
            TLV_NDEF_MESSAGE => {
                let (len, consumed) = tlv_length(memory.get(i + 1..)?)?;
                let start = i + 1 + consumed;
                let end = start.checked_add(len)?;
                if end > memory.len() {
                    return None;
                }
                return Some(&memory[start..end]);
            }
            _ => {
                // Lock control, memory control, proprietary: length-prefixed.
                let (len, consumed) = tlv_length(memory.get(i + 1..)?)?;
                i = i + 1 + consumed + len;
            }
        }
    }
    None
}

/// TLV length field: one byte, or 0xFF followed by a big-endian u16.
/// Returns (length, bytes consumed by the field).
fn tlv_length(data: &[u8]) -> Option<(usize, usize)> {
    match *data.first()? {
        0xFF => {
            let hi = *data.get(1)?;
            let lo = *data.get(2)?;
            Some((u16::from_be_bytes([hi, lo]) as usize, 3))
        }
        n => Some((n as usize, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    #[test]
    fn extracts_text_record() {
        let memory = fixtures::ndef_text_memory("living-room-lamp");
        assert_eq!(
            extract_tag_content(&memory).as_deref(),
            Some("living-room-lamp")
        );
    }

    #[test]
    fn extracts_uri_record_with_prefix_expansion() {
        // 0x04 = "https://"
        let memory = fixtures::ndef_uri_memory(0x04, "example.org/door");
        assert_eq!(
            extract_tag_content(&memory).as_deref(),
            Some("https://example.org/door")
        );
    }

    #[test]
    fn unwraps_tag_registry_url_to_identifier() {
        let memory = fixtures::ndef_uri_memory(
            0x04,
            "www.home-assistant.io/tag/5f2b1c9e-0d4a-4b6e-9f3c-2a7d8e1f0b6c",
        );
        assert_eq!(
            extract_tag_content(&memory).as_deref(),
            Some("5f2b1c9e-0d4a-4b6e-9f3c-2a7d8e1f0b6c")
        );
    }

    #[test]
    fn null_and_lock_tlvs_before_message_are_skipped() {
        let mut memory = vec![0x00, 0x00, 0x01, 0x03, 0xE1, 0x10, 0x06];
        let tail = fixtures::ndef_text_memory("x");
        memory.extend_from_slice(&tail);
        memory.truncate(176);
        assert_eq!(extract_tag_content(&memory).as_deref(), Some("x"));
    }

    #[test]
    fn terminator_before_message_means_empty_tag() {
        let mut memory = vec![0xFE];
        memory.resize(176, 0x00);
        assert_eq!(extract_tag_content(&memory), None);
    }

    #[test]
    fn blank_memory_yields_nothing() {
        assert_eq!(extract_tag_content(&[0u8; 176]), None);
    }

    #[test]
    fn message_length_past_buffer_is_rejected() {
        let memory = [0x03, 0xF0, 0xD1, 0x01];
        assert_eq!(extract_tag_content(&memory), None);
    }

    #[test]
    fn three_byte_tlv_length_is_honored() {
        // Short record, but declared through the 0xFF length form.
        let record = [0xD1, 0x01, 0x04, 0x54, 0x02, b'e', b'n', b'y'];
        let mut memory = vec![0x03, 0xFF, 0x00, record.len() as u8];
        memory.extend_from_slice(&record);
        memory.push(0xFE);
        memory.resize(176, 0x00);
        assert_eq!(extract_tag_content(&memory).as_deref(), Some("y"));
    }

    #[test]
    fn garbage_memory_never_panics() {
        let memory: Vec<u8> = (0u8..=255).cycle().take(176).collect();
        let _ = extract_tag_content(&memory);
    }
}
