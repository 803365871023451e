// Full tap scenarios driven through the public Bridge API over a scripted
// transport, covering both payload modes and card swaps.

#[path = "../common/mod.rs"]
mod common;

use common::{fixtures, helpers};
use std::cell::RefCell;
use std::rc::Rc;
use tagbridge::test_support::ScriptedSink;
use tagbridge::{MockTransport, PayloadMode};

#[test]
fn ndef_tap_fires_one_event_with_written_content() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::default();
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Ndef);

    {
        let mut mock = shared.borrow_mut();
        fixtures::seed_poll_absent(&mut mock);
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_memory_read(&mut mock, &fixtures::ndef_text_memory("living-room-lamp"));
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_poll_absent(&mut mock);
    }

    for _ in 0..4 {
        bridge.run_cycle().unwrap();
    }

    let posted = posted.borrow();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].event_type, "tag_scanned");
    assert_eq!(posted[0].event_data.tag_id, "living-room-lamp");
    assert_eq!(posted[0].event_data.device_id, "reader-1");
}

#[test]
fn uri_tag_resolves_to_registry_identifier() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::default();
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Ndef);

    {
        let mut mock = shared.borrow_mut();
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_memory_read(
            &mut mock,
            &fixtures::ndef_uri_memory(0x04, "www.home-assistant.io/tag/front-door"),
        );
    }

    bridge.run_cycle().unwrap();
    assert_eq!(posted.borrow()[0].event_data.tag_id, "front-door");
}

#[test]
fn uuid_mode_uses_hardware_id_and_skips_memory_reads() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::default();
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Uuid);

    {
        let mut mock = shared.borrow_mut();
        fixtures::seed_poll_absent(&mut mock);
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_poll_absent(&mut mock);
    }

    for _ in 0..4 {
        bridge.run_cycle().unwrap();
    }

    assert_eq!(posted.borrow().len(), 1);
    assert_eq!(posted.borrow()[0].event_data.tag_id, "04a10001");
    // One frame per poll and nothing else went out.
    assert_eq!(shared.borrow().sent.len(), 4);
}

#[test]
fn card_swap_between_polls_fires_second_event() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::default();
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Uuid);

    {
        let mut mock = shared.borrow_mut();
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xB2, 0x00, 0x02]);
        fixtures::seed_poll_absent(&mut mock);
    }

    for _ in 0..3 {
        bridge.run_cycle().unwrap();
    }

    let posted = posted.borrow();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].event_data.tag_id, "04a10001");
    assert_eq!(posted[1].event_data.tag_id, "04b20002");
}

#[test]
fn blank_tag_in_ndef_mode_is_suppressed() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::default();
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Ndef);

    {
        let mut mock = shared.borrow_mut();
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        // Tag answers every read but holds no NDEF message.
        fixtures::seed_memory_read(&mut mock, &[0u8; 176]);
    }

    bridge.run_cycle().unwrap();
    assert!(posted.borrow().is_empty());
}
