// tagbridge/src/service.rs
//! Orchestrator: the poll/track/dispatch loop, its health signal, and
//! cooperative shutdown.

use crate::config::Config;
use crate::dispatch::{DispatchOutcome, Dispatcher, HttpSink, PayloadMode};
use crate::ndef;
use crate::presence::PresenceTracker;
use crate::session::Session;
use crate::transport::{detect_reader, SerialTransport};
use crate::types::{PresenceEvent, Uid};
use crate::utils::{Sleeper, ThreadSleeper};
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Cheaply clonable health signal. The loop stamps it after every
/// successful poll cycle; a supervisor thread (or test) reads the age.
#[derive(Debug, Clone, Default)]
pub struct Health {
    last_ok: Arc<AtomicU64>,
}

impl Health {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&self) {
        self.last_ok.store(epoch_seconds(), Ordering::Relaxed);
    }

    /// Epoch seconds of the last successful poll cycle; 0 before the first.
    pub fn last_ok_epoch(&self) -> u64 {
        self.last_ok.load(Ordering::Relaxed)
    }

    /// True when a poll cycle has succeeded within the last `within`.
    pub fn is_healthy(&self, within: Duration) -> bool {
        let last = self.last_ok_epoch();
        last != 0 && epoch_seconds().saturating_sub(last) <= within.as_secs()
    }
}

/// Set `stop` when the process receives SIGTERM or SIGINT, so a service
/// manager stop (or Ctrl-C) drains the loop instead of killing it mid-cycle.
pub fn register_stop_signals(stop: Arc<AtomicBool>) -> Result<()> {
    signal_hook::flag::register(signal_hook::consts::SIGTERM, stop.clone())?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, stop)?;
    Ok(())
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The bridge service: owns the reader session, the presence tracker and
/// the event dispatcher, and runs them as one single-threaded loop.
pub struct Bridge {
    session: Session,
    tracker: PresenceTracker,
    dispatcher: Dispatcher,
    sleeper: Box<dyn Sleeper>,
    poll_interval: Duration,
    health: Health,
    stop: Arc<AtomicBool>,
}

impl Bridge {
    pub fn new(
        session: Session,
        mut dispatcher: Dispatcher,
        sleeper: Box<dyn Sleeper>,
        poll_interval: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        dispatcher.bind_stop(stop.clone());
        Self {
            session,
            tracker: PresenceTracker::new(),
            dispatcher,
            sleeper,
            poll_interval,
            health: Health::new(),
            stop,
        }
    }

    /// Wire up a bridge from configuration: open (or probe for) the serial
    /// device and build the HTTP dispatcher.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.read_timeout();
        let path = match &config.serial.port {
            Some(path) => path.clone(),
            None => detect_reader(config.serial.baud_rate, timeout)?,
        };
        let transport = SerialTransport::open(&path, config.serial.baud_rate)?;
        let session = Session::new(Box::new(transport), timeout);

        let sink = HttpSink::new(
            &config.home_assistant.base_url,
            &config.home_assistant.token,
        )?;
        match sink.check_api() {
            Ok(()) => log::info!(
                "Home Assistant reachable at {}",
                config.home_assistant.base_url
            ),
            Err(e @ Error::AuthRejected { .. }) => return Err(e),
            Err(e) => log::warn!("Home Assistant not reachable yet: {}", e),
        }
        let dispatcher = Dispatcher::new(
            Box::new(sink),
            Box::new(ThreadSleeper),
            config.retry_policy(),
            config.device_id.clone(),
            config.home_assistant.payload_mode,
        );

        Ok(Self::new(
            session,
            dispatcher,
            Box::new(ThreadSleeper),
            config.poll_interval(),
        ))
    }

    /// Handle other threads use to request shutdown (signal handlers).
    /// The loop finishes its current cycle and returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn health(&self) -> Health {
        self.health.clone()
    }

    /// One poll cycle: poll for presence, fold the outcome into the
    /// tracker, and act on each resulting event in order.
    pub fn run_cycle(&mut self) -> Result<()> {
        let poll = self.session.poll_presence()?;
        self.health.touch();
        for event in self.tracker.observe(poll) {
            match event {
                PresenceEvent::Removed => log::info!("card removed"),
                PresenceEvent::Detected(uid) => self.handle_detection(uid)?,
            }
        }
        Ok(())
    }

    /// Initialize the reader, then poll until stopped. Poll and delivery
    /// failures are logged and survived; credential rejection ends the
    /// loop, since every future delivery would fail the same way.
    pub fn run(&mut self) -> Result<()> {
        self.session.initialize()?;
        log::info!("bridge running, polling every {:?}", self.poll_interval);
        while !self.stop.load(Ordering::Relaxed) {
            match self.run_cycle() {
                Ok(()) => {}
                Err(e @ Error::AuthRejected { .. }) => return Err(e),
                Err(e) => log::warn!("poll cycle failed: {}", e),
            }
            self.sleeper.sleep(self.poll_interval);
        }
        log::info!("stop requested, shutting down");
        Ok(())
    }

    fn handle_detection(&mut self, uid: Uid) -> Result<()> {
        log::info!("card detected: {}", uid);
        let content = match self.dispatcher.mode() {
            PayloadMode::Uuid => None,
            PayloadMode::Ndef => match self.session.read_tag_memory() {
                Ok(Some(memory)) => ndef::extract_tag_content(&memory),
                Ok(None) => None,
                Err(e) => {
                    log::warn!("tag memory read failed: {}", e);
                    None
                }
            },
        };

        match self.dispatcher.dispatch(&uid, content.as_deref())? {
            DispatchOutcome::Sent { attempts } => {
                log::debug!("event for tag {} delivered in {} attempt(s)", uid, attempts);
            }
            DispatchOutcome::Suppressed(reason) => {
                log::warn!("tag {}: {}, event suppressed", uid, reason);
            }
            DispatchOutcome::Failed(e) => {
                log::warn!("event for tag {} dropped: {}", uid, e);
            }
        }
        Ok(())
    }
}
