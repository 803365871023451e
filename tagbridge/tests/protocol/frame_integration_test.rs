// Frame codec exercised through the public API with captured wire bytes.

use tagbridge::protocol::frame::is_ack;
use tagbridge::protocol::{Direction, Frame};
use tagbridge::Error;

#[test]
fn firmware_request_matches_captured_wire_bytes() {
    let wire = Frame::host(vec![0x02]).encode().unwrap();
    assert_eq!(hex::encode(&wire), "0000ff02fed4022a00");
}

#[test]
fn captured_firmware_response_decodes() {
    // 00 00 FF 06 FA D5 03 32 01 06 07 E8 00 as answered by a PN532
    let wire = hex::decode("0000ff06fad50332010607e800").unwrap();
    let frame = Frame::decode(&wire).unwrap();
    assert_eq!(frame.direction, Direction::ReaderToHost);
    assert_eq!(frame.payload, vec![0x03, 0x32, 0x01, 0x06, 0x07]);
    assert_eq!(frame.wire_len(), wire.len());
}

#[test]
fn ack_is_recognized_and_never_decodes() {
    let ack = hex::decode("0000ff00ff00").unwrap();
    assert!(is_ack(&ack));
    assert!(Frame::decode(&ack).is_err());
}

#[test]
fn corrupted_capture_is_rejected() {
    let mut wire = hex::decode("0000ff06fad50332010607e800").unwrap();
    wire[7] ^= 0x01;
    assert!(matches!(
        Frame::decode(&wire),
        Err(Error::ChecksumMismatch { .. })
    ));
}

#[test]
fn streaming_decode_reports_needed_bytes() {
    let wire = hex::decode("0000ff06fad50332010607e800").unwrap();
    match Frame::decode(&wire[..8]) {
        Err(Error::Truncated { needed, available }) => {
            assert_eq!(needed, wire.len());
            assert_eq!(available, 8);
        }
        other => panic!("expected Truncated, got: {:?}", other),
    }
}
