// tagbridge/src/ndef/uri.rs

/// URI identifier codes from the NFC Forum URI record type definition.
/// The payload's first byte indexes this table; the remaining bytes are
/// appended to the prefix.
const URI_PREFIXES: [&str; 0x24] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Marker segment of tag registry URLs as written by companion apps. The
/// identifier after it is the useful part of the URI.
const TAG_URL_MARKER: &str = "/tag/";

/// Expand a URI record payload into content for a tag event: prefix code
/// plus remainder, with registry URLs reduced to their tag identifier.
/// Unknown prefix codes and non-UTF-8 remainders yield `None`.
pub fn expand(payload: &[u8]) -> Option<String> {
    let code = *payload.first()? as usize;
    let prefix = URI_PREFIXES.get(code)?;
    let rest = std::str::from_utf8(payload.get(1..)?).ok()?;
    let full = format!("{}{}", prefix, rest);

    if let Some(pos) = full.rfind(TAG_URL_MARKER) {
        let id = &full[pos + TAG_URL_MARKER.len()..];
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }
    Some(full)
}
