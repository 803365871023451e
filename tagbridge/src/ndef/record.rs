// tagbridge/src/ndef/record.rs

use crate::ndef::uri;

const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

const TNF_WELL_KNOWN: u8 = 0x01;

/// One record of an NDEF message, borrowed from the message buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct Record<'a> {
    pub tnf: u8,
    pub record_type: &'a [u8],
    pub payload: &'a [u8],
}

impl Record<'_> {
    /// Content usable for a tag event: the expanded URI of a `U` record,
    /// the text of a `T` record, or for any other record type the payload
    /// as printable UTF-8 with a hex rendering as last resort. Empty
    /// payloads yield `None`.
    pub fn content(&self) -> Option<String> {
        match (self.tnf, self.record_type) {
            (TNF_WELL_KNOWN, b"U") => uri::expand(self.payload),
            (TNF_WELL_KNOWN, b"T") => decode_text(self.payload),
            _ => fallback_content(self.payload),
        }
    }
}

fn fallback_content(payload: &[u8]) -> Option<String> {
    if payload.is_empty() {
        return None;
    }
    match std::str::from_utf8(payload) {
        Ok(s) if !s.chars().any(char::is_control) => Some(s.to_string()),
        _ => Some(crate::utils::bytes_to_hex(payload)),
    }
}

/// Text record payload: status byte (UTF-16 flag, language length), the
/// language code, then the text itself.
fn decode_text(payload: &[u8]) -> Option<String> {
    let status = *payload.first()?;
    if status & 0x80 != 0 {
        // UTF-16 text records do not occur on tags written for automation
        // use; skip rather than transcode.
        return None;
    }
    let lang_len = (status & 0x3F) as usize;
    let text = payload.get(1 + lang_len..)?;
    String::from_utf8(text.to_vec()).ok()
}

/// Iterate over the records of an NDEF message. Parsing stops at the first
/// malformed or chunked record; everything before it is still yielded.
pub fn records(message: &[u8]) -> Records<'_> {
    Records { rest: message }
}

pub struct Records<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        let (record, rest) = parse_record(self.rest)?;
        self.rest = rest;
        Some(record)
    }
}

fn parse_record(data: &[u8]) -> Option<(Record<'_>, &[u8])> {
    let header = *data.first()?;
    if header & FLAG_CF != 0 {
        // Chunked records are out of scope for tag payloads.
        return None;
    }

    let type_len = *data.get(1)? as usize;
    let mut i = 2;

    let payload_len = if header & FLAG_SR != 0 {
        let len = *data.get(i)? as usize;
        i += 1;
        len
    } else {
        let bytes = data.get(i..i + 4)?;
        i += 4;
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize
    };

    let id_len = if header & FLAG_IL != 0 {
        let len = *data.get(i)? as usize;
        i += 1;
        len
    } else {
        0
    };

    let record_type = data.get(i..i + type_len)?;
    i += type_len;
    i = i.checked_add(id_len)?;
    let payload = data.get(i..i.checked_add(payload_len)?)?;
    let rest = &data[i + payload_len..];

    Some((
        Record {
            tnf: header & TNF_MASK,
            record_type,
            payload,
        },
        rest,
    ))
}
