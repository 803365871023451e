// Shared helpers for integration tests. Wire fixtures come from the
// crate's public test_support module; this adds bridge assembly on top.
#![allow(dead_code)]

pub use tagbridge::test_support::fixtures;

pub mod helpers {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use tagbridge::test_support::{RecordingSleeper, ScriptedSink, SharedTransport};
    use tagbridge::{
        Bridge, Dispatcher, MockTransport, PayloadMode, RetryPolicy, Session,
    };

    pub fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            base: Duration::from_millis(10),
            cap: Duration::from_millis(100),
            max_attempts: 3,
        }
    }

    pub fn session_over(shared: Rc<RefCell<MockTransport>>) -> Session {
        Session::new(
            Box::new(SharedTransport::new(shared)),
            Duration::from_millis(50),
        )
    }

    /// Bridge over a shared mock transport and a scripted sink, with
    /// recording sleepers so tests never wait on the clock.
    pub fn bridge_over(
        shared: Rc<RefCell<MockTransport>>,
        sink: ScriptedSink,
        mode: PayloadMode,
    ) -> Bridge {
        let dispatcher = Dispatcher::new(
            Box::new(sink),
            Box::new(RecordingSleeper::default()),
            fast_policy(),
            "reader-1".to_string(),
            mode,
        );
        Bridge::new(
            session_over(shared),
            dispatcher,
            Box::new(RecordingSleeper::default()),
            Duration::from_millis(10),
        )
    }
}
