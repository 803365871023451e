// Response decoding exercised on full captured frames, from wire bytes
// through the frame codec to typed responses.

#[path = "../common/mod.rs"]
mod common;

use tagbridge::protocol::{Frame, Response};
use tagbridge::{CardKind, Error};

fn decode(expected_cmd: u8, wire: &[u8]) -> tagbridge::Result<Response> {
    let frame = Frame::decode(wire)?;
    Response::decode(expected_cmd, &frame.payload)
}

#[test]
fn ntag_detection_frame_decodes_to_target() {
    let wire = common::fixtures::response_frame(&common::fixtures::target_list_payload(&[&[
        0x04, 0xA1, 0x00, 0x01,
    ]]));
    match decode(0x4A, &wire).unwrap() {
        Response::TargetList { targets } => {
            assert_eq!(targets.len(), 1);
            assert_eq!(targets[0].uid.to_hex(), "04a10001");
            assert_eq!(targets[0].kind(), CardKind::MifareUltralight);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn empty_field_frame_decodes_to_empty_list() {
    let wire = common::fixtures::response_frame(&[0x4B, 0x00]);
    match decode(0x4A, &wire).unwrap() {
        Response::TargetList { targets } => assert!(targets.is_empty()),
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn seven_byte_identifier_is_supported() {
    let uid = [0x04, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E, 0x6F];
    let wire = common::fixtures::response_frame(&common::fixtures::target_list_payload(&[&uid]));
    match decode(0x4A, &wire).unwrap() {
        Response::TargetList { targets } => {
            assert_eq!(targets[0].uid.as_bytes(), &uid);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn data_exchange_timeout_status_is_surfaced() {
    // Status 0x01 is the chip's exchange timeout
    let wire = common::fixtures::response_frame(&[0x41, 0x01]);
    assert!(matches!(
        decode(0x40, &wire),
        Err(Error::ExchangeStatus { code: 0x01 })
    ));
}

#[test]
fn status_high_bits_are_masked() {
    // NAD/MI bits set on an otherwise successful exchange
    let wire = common::fixtures::response_frame(&[0x41, 0x40, 0xAB]);
    match decode(0x40, &wire).unwrap() {
        Response::DataExchange { data } => assert_eq!(data, vec![0xAB]),
        other => panic!("unexpected response: {:?}", other),
    }
}
