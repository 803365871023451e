// Serial loss and recovery: the session reopens the device after repeated
// transport failures and the bridge keeps polling afterwards.

#[path = "../common/mod.rs"]
mod common;

use common::{fixtures, helpers};
use std::cell::RefCell;
use std::rc::Rc;
use tagbridge::test_support::ScriptedSink;
use tagbridge::{MockTransport, PayloadMode, PollResult};

#[test]
fn silent_reader_triggers_reopen_after_three_failed_polls() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let mut session = helpers::session_over(shared.clone());

    for _ in 0..2 {
        assert!(session.poll_presence().is_err());
    }
    assert_eq!(shared.borrow().reopen_count, 0);

    // Third failure crosses the threshold. It has to fail at the write so
    // the seeded handshake stays queued for the reconnect sequence.
    {
        let mut mock = shared.borrow_mut();
        mock.fail_writes(1);
        fixtures::seed_init(&mut mock);
    }
    assert!(session.poll_presence().is_err());
    assert_eq!(shared.borrow().reopen_count, 1);

    fixtures::seed_poll_absent(&mut shared.borrow_mut());
    assert_eq!(session.poll_presence().unwrap(), PollResult::Absent);
}

#[test]
fn bridge_survives_poll_outage_and_resumes_events() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::default();
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Uuid);

    // Two dead cycles, then the reader comes back.
    assert!(bridge.run_cycle().is_err());
    assert!(bridge.run_cycle().is_err());

    {
        let mut mock = shared.borrow_mut();
        // Third poll fails at the write; the seeded handshake answers the
        // reconnect it triggers.
        mock.fail_writes(1);
        fixtures::seed_init(&mut mock);
    }
    assert!(bridge.run_cycle().is_err());

    fixtures::seed_poll_present(&mut shared.borrow_mut(), &[0x04, 0xA1, 0x00, 0x01]);
    bridge.run_cycle().unwrap();
    assert_eq!(posted.borrow().len(), 1);
}
