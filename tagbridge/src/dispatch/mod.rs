// tagbridge/src/dispatch/mod.rs
//! Outbound side of the bridge: turn a card detection into a `tag_scanned`
//! event and deliver it with bounded retries.

pub mod backoff;
pub mod sink;

pub use backoff::RetryPolicy;
pub use sink::{EventSink, HttpSink};

use crate::types::Uid;
use crate::utils::Sleeper;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What identifies a tag in outbound events: the content written on it, or
/// its hardware identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadMode {
    /// Tag id is the first usable NDEF record content. Detections on tags
    /// without usable content are suppressed.
    #[default]
    Ndef,
    /// Tag id is the lower-case hex of the hardware identifier. No memory
    /// read is needed in this mode.
    Uuid,
}

/// Wire shape of one `tag_scanned` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEvent {
    pub event_type: String,
    pub event_data: TagEventData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEventData {
    pub tag_id: String,
    pub device_id: String,
}

impl TagEvent {
    pub fn tag_scanned(tag_id: &str, device_id: &str) -> Self {
        Self {
            event_type: "tag_scanned".to_string(),
            event_data: TagEventData {
                tag_id: tag_id.to_string(),
                device_id: device_id.to_string(),
            },
        }
    }
}

/// Result of dispatching one detection.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Delivered after this many attempts (1 = first try).
    Sent { attempts: u32 },
    /// No event was owed for this detection.
    Suppressed(&'static str),
    /// Retries exhausted or cut short by shutdown; the event is dropped.
    Failed(Error),
}

/// Owns a sink and a retry policy; delivers one event at a time. Detections
/// arrive faster than deliveries only in pathological cases, so the retry
/// loop blocking the poll cycle is acceptable.
pub struct Dispatcher {
    sink: Box<dyn EventSink>,
    sleeper: Box<dyn Sleeper>,
    policy: RetryPolicy,
    device_id: String,
    mode: PayloadMode,
    stop: Option<Arc<AtomicBool>>,
}

impl Dispatcher {
    pub fn new(
        sink: Box<dyn EventSink>,
        sleeper: Box<dyn Sleeper>,
        policy: RetryPolicy,
        device_id: String,
        mode: PayloadMode,
    ) -> Self {
        Self {
            sink,
            sleeper,
            policy,
            device_id,
            mode,
            stop: None,
        }
    }

    /// Honor an external stop signal during backoff waits: once set, no
    /// further retry sleeps are started.
    pub fn bind_stop(&mut self, stop: Arc<AtomicBool>) {
        self.stop = Some(stop);
    }

    pub fn mode(&self) -> PayloadMode {
        self.mode
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|s| s.load(Ordering::Relaxed))
    }

    /// Resolve the outbound tag id for a detected card. `None` suppresses
    /// the event (ndef mode, card without usable content).
    pub fn tag_id(&self, uid: &Uid, content: Option<&str>) -> Option<String> {
        match self.mode {
            PayloadMode::Ndef => content.map(str::to_string),
            PayloadMode::Uuid => Some(uid.to_hex()),
        }
    }

    /// Resolve the outbound identifier for a detection and deliver it,
    /// retrying transient failures per the policy. Only an authorization
    /// rejection is an `Err`; it never resolves on its own and signals a
    /// configuration problem the caller must act on.
    pub fn dispatch(&mut self, uid: &Uid, content: Option<&str>) -> Result<DispatchOutcome> {
        let Some(tag_id) = self.tag_id(uid, content) else {
            return Ok(DispatchOutcome::Suppressed("no ndef content"));
        };
        self.deliver(&tag_id)
    }

    fn deliver(&mut self, tag_id: &str) -> Result<DispatchOutcome> {
        let event = TagEvent::tag_scanned(tag_id, &self.device_id);
        let mut attempt = 0u32;
        loop {
            match self.sink.post(&event) {
                Ok(()) => {
                    log::info!("event delivered: tag_id={}", tag_id);
                    return Ok(DispatchOutcome::Sent {
                        attempts: attempt + 1,
                    });
                }
                Err(e) if e.is_retryable_delivery() && attempt + 1 < self.policy.max_attempts => {
                    if self.stop_requested() {
                        log::info!("shutdown requested, not retrying event");
                        return Ok(DispatchOutcome::Failed(e));
                    }
                    let delay = self.policy.delay(attempt);
                    log::warn!(
                        "delivery attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        e,
                        delay
                    );
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                Err(e @ Error::AuthRejected { .. }) => {
                    log::error!("{}", e);
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("giving up on event after {} attempts: {}", attempt + 1, e);
                    return Ok(DispatchOutcome::Failed(e));
                }
            }
        }
    }
}
