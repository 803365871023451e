// Delivery retry behavior observed from the outside: attempt counts,
// recorded backoff sleeps, and the fatal credential path.

#[path = "../common/mod.rs"]
mod common;

use common::{fixtures, helpers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tagbridge::test_support::{RecordingSleeper, ScriptedSink};
use tagbridge::{
    Bridge, Dispatcher, Error, MockTransport, PayloadMode,
};

fn bridge_with_sleeper(
    shared: Rc<RefCell<MockTransport>>,
    sink: ScriptedSink,
    retry_sleeper: RecordingSleeper,
) -> Bridge {
    let dispatcher = Dispatcher::new(
        Box::new(sink),
        Box::new(retry_sleeper),
        helpers::fast_policy(),
        "reader-1".to_string(),
        PayloadMode::Uuid,
    );
    Bridge::new(
        helpers::session_over(shared),
        dispatcher,
        Box::new(RecordingSleeper::default()),
        Duration::from_millis(10),
    )
}

#[test]
fn transient_outage_is_retried_until_accepted() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::with_statuses(&[503, 503, 200]);
    let posted = sink.posted.clone();
    let sleeper = RecordingSleeper::default();
    let slept = sleeper.slept.clone();
    let mut bridge = bridge_with_sleeper(shared.clone(), sink, sleeper);

    fixtures::seed_poll_present(&mut shared.borrow_mut(), &[0x04, 0xA1, 0x00, 0x01]);
    bridge.run_cycle().unwrap();

    assert_eq!(posted.borrow().len(), 3);
    let slept = slept.borrow();
    assert_eq!(slept.len(), 2);
    // The first wait is at least the first backoff interval, and the
    // second sits in a strictly higher envelope.
    assert!(slept[0] >= Duration::from_millis(10));
    assert!(slept[0] <= Duration::from_millis(15));
    assert!(slept[1] >= Duration::from_millis(20));
    assert!(slept[1] <= Duration::from_millis(30));
}

#[test]
fn persistent_outage_drops_the_event_but_keeps_polling() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::with_statuses(&[503; 10]);
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Uuid);

    {
        let mut mock = shared.borrow_mut();
        fixtures::seed_poll_present(&mut mock, &[0x04, 0xA1, 0x00, 0x01]);
        fixtures::seed_poll_absent(&mut mock);
    }

    // The drop is not a cycle failure; polling continues.
    bridge.run_cycle().unwrap();
    bridge.run_cycle().unwrap();
    assert_eq!(posted.borrow().len(), helpers::fast_policy().max_attempts as usize);
}

#[test]
fn rejected_token_aborts_without_retries() {
    let shared = Rc::new(RefCell::new(MockTransport::new()));
    let sink = ScriptedSink::with_statuses(&[403, 200, 200]);
    let posted = sink.posted.clone();
    let mut bridge = helpers::bridge_over(shared.clone(), sink, PayloadMode::Uuid);

    fixtures::seed_poll_present(&mut shared.borrow_mut(), &[0x04, 0xA1, 0x00, 0x01]);
    assert!(matches!(
        bridge.run_cycle(),
        Err(Error::AuthRejected { status: 403 })
    ));
    assert_eq!(posted.borrow().len(), 1);
}
