// tagbridge/src/presence.rs
//! Presence reducer: folds raw poll outcomes into discrete detected/removed
//! events. Pure state, no I/O; the orchestrator owns one tracker and feeds
//! it once per cycle.

use crate::types::{PollResult, PresenceEvent, PresenceState};

/// Tracks which card, if any, is currently in the field and suppresses
/// repeated observations of the same outcome.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    state: PresenceState,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PresenceState {
        &self.state
    }

    /// Fold one poll outcome into the tracked state and return the events
    /// the transition implies, in emission order. A card swapped between
    /// two polls yields `Removed` for the old card, then `Detected` for
    /// the new one.
    pub fn observe(&mut self, poll: PollResult) -> Vec<PresenceEvent> {
        match (&self.state, poll) {
            (PresenceState::Absent, PollResult::Absent) => vec![],
            (PresenceState::Absent, PollResult::Present(uid)) => {
                self.state = PresenceState::Present(uid.clone());
                vec![PresenceEvent::Detected(uid)]
            }
            (PresenceState::Present(_), PollResult::Absent) => {
                self.state = PresenceState::Absent;
                vec![PresenceEvent::Removed]
            }
            (PresenceState::Present(current), PollResult::Present(uid)) => {
                if *current == uid {
                    vec![]
                } else {
                    self.state = PresenceState::Present(uid.clone());
                    vec![PresenceEvent::Removed, PresenceEvent::Detected(uid)]
                }
            }
        }
    }
}
