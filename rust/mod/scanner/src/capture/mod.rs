//! Scan-input capture.
//!
//! A [`ScanInput`] is a device that turns barcodes into text tokens. The
//! [`CaptureController`] owns one input and tracks it through
//! [`CaptureState`]. Every start opens a new generation; events carry the
//! generation they were produced under, and anything from an older
//! generation, or any decode that arrives while the capture is not
//! `Running`, is dropped.

mod device;
mod keyboard;
#[cfg(test)]
pub(crate) mod scripted;

pub use device::DeviceInput;
pub use keyboard::{parse_line, spawn_stdin_reader, KeyboardWedge, Line, WedgeFeed};

use tokio::sync::mpsc;

use crate::error::CaptureError;

/// Lifecycle of the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
}

impl CaptureState {
    /// Next state when a start is requested, or `None` when the capture is
    /// already running or on its way there.
    pub fn start_requested(self) -> Option<Self> {
        match self {
            CaptureState::Idle | CaptureState::Stopping => Some(CaptureState::Starting),
            CaptureState::Starting | CaptureState::Running => None,
        }
    }

    pub fn stop_requested(self) -> Option<Self> {
        match self {
            CaptureState::Starting | CaptureState::Running => Some(CaptureState::Stopping),
            CaptureState::Idle | CaptureState::Stopping => None,
        }
    }

    pub fn acquired(self) -> Option<Self> {
        match self {
            CaptureState::Starting => Some(CaptureState::Running),
            _ => None,
        }
    }

    pub fn released(self) -> Option<Self> {
        match self {
            CaptureState::Stopping => Some(CaptureState::Idle),
            _ => None,
        }
    }

    pub fn failed(self) -> Option<Self> {
        match self {
            CaptureState::Starting | CaptureState::Running => Some(CaptureState::Idle),
            _ => None,
        }
    }

    pub fn accepts_decodes(self) -> bool {
        self == CaptureState::Running
    }
}

/// Raw event reported by an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Acquired,
    Decoded(String),
    Failed(String),
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub generation: u64,
    pub event: CaptureEvent,
}

/// Handle an input reports through. Bound to the generation it was
/// handed out for.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<Signal>,
}

impl EventSink {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn acquired(&self) {
        self.send(CaptureEvent::Acquired);
    }

    pub fn decoded(&self, token: impl Into<String>) {
        self.send(CaptureEvent::Decoded(token.into()));
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.send(CaptureEvent::Failed(reason.into()));
    }

    pub fn released(&self) {
        self.send(CaptureEvent::Released);
    }

    fn send(&self, event: CaptureEvent) {
        // The screen is gone; nothing left to tell.
        let _ = self.tx.send(Signal {
            generation: self.generation,
            event,
        });
    }
}

/// A device that decodes barcodes into tokens.
///
/// `start` must answer through the sink with `acquired` or `failed`.
/// `stop` must stop decoding and answer with `released` once the device is
/// closed. Both may be called repeatedly.
pub trait ScanInput: Send + 'static {
    fn name(&self) -> &str;
    fn start(&mut self, sink: EventSink);
    fn stop(&mut self);
}

/// What a signal meant to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureUpdate {
    Acquired,
    Token(String),
    Failed(CaptureError),
}

pub struct CaptureController<I: ScanInput> {
    input: I,
    state: CaptureState,
    generation: u64,
    tx: mpsc::UnboundedSender<Signal>,
}

impl<I: ScanInput> CaptureController<I> {
    pub fn new(input: I) -> (Self, mpsc::UnboundedReceiver<Signal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ctrl = Self {
            input,
            state: CaptureState::Idle,
            generation: 0,
            tx,
        };
        (ctrl, rx)
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self) {
        let Some(next) = self.state.start_requested() else {
            return;
        };
        self.generation += 1;
        self.state = next;
        tracing::debug!(input = self.input.name(), generation = self.generation, "capture starting");
        self.input.start(EventSink {
            generation: self.generation,
            tx: self.tx.clone(),
        });
    }

    pub fn stop(&mut self) {
        let Some(next) = self.state.stop_requested() else {
            return;
        };
        self.state = next;
        tracing::debug!(input = self.input.name(), generation = self.generation, "capture stopping");
        self.input.stop();
    }

    /// Apply a signal. Returns what the screen has to act on, if anything.
    pub fn handle(&mut self, signal: Signal) -> Option<CaptureUpdate> {
        if signal.generation != self.generation {
            tracing::debug!(
                generation = signal.generation,
                current = self.generation,
                "dropping stale capture event"
            );
            return None;
        }

        match signal.event {
            CaptureEvent::Acquired => {
                self.state = self.state.acquired()?;
                Some(CaptureUpdate::Acquired)
            }
            CaptureEvent::Decoded(token) => {
                if !self.state.accepts_decodes() {
                    tracing::debug!(state = ?self.state, "dropping decode outside running capture");
                    return None;
                }
                Some(CaptureUpdate::Token(token))
            }
            CaptureEvent::Failed(reason) => {
                let was = self.state;
                self.state = was.failed()?;
                self.input.stop();
                let err = match was {
                    CaptureState::Running => CaptureError::Disconnected(reason),
                    _ => CaptureError::Unavailable(reason),
                };
                Some(CaptureUpdate::Failed(err))
            }
            CaptureEvent::Released => {
                self.state = self.state.released()?;
                None
            }
        }
    }

    /// Release the input. Safe to call more than once.
    pub fn close(&mut self) {
        self.stop();
    }
}

impl<I: ScanInput> Drop for CaptureController<I> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedInput;
    use super::*;

    #[test]
    fn start_and_stop_are_noops_when_settling_toward_target() {
        use CaptureState::*;
        assert_eq!(Idle.start_requested(), Some(Starting));
        assert_eq!(Stopping.start_requested(), Some(Starting));
        assert_eq!(Starting.start_requested(), None);
        assert_eq!(Running.start_requested(), None);

        assert_eq!(Running.stop_requested(), Some(Stopping));
        assert_eq!(Starting.stop_requested(), Some(Stopping));
        assert_eq!(Stopping.stop_requested(), None);
        assert_eq!(Idle.stop_requested(), None);
    }

    #[test]
    fn acknowledgements_only_apply_in_matching_state() {
        use CaptureState::*;
        assert_eq!(Starting.acquired(), Some(Running));
        assert_eq!(Stopping.acquired(), None);
        assert_eq!(Stopping.released(), Some(Idle));
        assert_eq!(Running.released(), None);
        assert_eq!(Running.failed(), Some(Idle));
        assert_eq!(Idle.failed(), None);
        assert!(Running.accepts_decodes());
        assert!(!Starting.accepts_decodes());
        assert!(!Stopping.accepts_decodes());
    }

    fn drain(ctrl: &mut CaptureController<ScriptedInput>, rx: &mut mpsc::UnboundedReceiver<Signal>) -> Vec<CaptureUpdate> {
        let mut updates = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            if let Some(update) = ctrl.handle(signal) {
                updates.push(update);
            }
        }
        updates
    }

    #[test]
    fn decodes_flow_once_running() {
        let input = ScriptedInput::new(&["A1", "A2"]);
        let (mut ctrl, mut rx) = CaptureController::new(input);
        ctrl.start();
        assert_eq!(ctrl.state(), CaptureState::Starting);

        let updates = drain(&mut ctrl, &mut rx);
        assert_eq!(
            updates,
            vec![
                CaptureUpdate::Acquired,
                CaptureUpdate::Token("A1".into()),
                CaptureUpdate::Token("A2".into()),
            ]
        );
        assert_eq!(ctrl.state(), CaptureState::Running);
    }

    #[test]
    fn nothing_delivered_after_stop() {
        let input = ScriptedInput::new(&[]);
        let monitor = input.monitor();
        let (mut ctrl, mut rx) = CaptureController::new(input);
        ctrl.start();
        drain(&mut ctrl, &mut rx);

        let sink = monitor.sink().unwrap();
        ctrl.stop();
        sink.decoded("LATE");
        assert!(drain(&mut ctrl, &mut rx).is_empty());
        assert_eq!(ctrl.state(), CaptureState::Idle);
        assert_eq!(monitor.stops(), 1);
    }

    #[test]
    fn stale_generation_is_dropped() {
        let input = ScriptedInput::new(&[]);
        let monitor = input.monitor();
        let (mut ctrl, mut rx) = CaptureController::new(input);
        ctrl.start();
        drain(&mut ctrl, &mut rx);
        let old = monitor.sink().unwrap();

        ctrl.stop();
        ctrl.start();
        assert_eq!(ctrl.generation(), 2);
        old.decoded("OLD");
        old.failed("old device gone");

        let updates = drain(&mut ctrl, &mut rx);
        assert_eq!(updates, vec![CaptureUpdate::Acquired]);
        assert_eq!(ctrl.state(), CaptureState::Running);
        assert_eq!(monitor.starts(), 2);
    }

    #[test]
    fn repeated_requests_do_not_restart_input() {
        let input = ScriptedInput::new(&[]);
        let monitor = input.monitor();
        let (mut ctrl, mut rx) = CaptureController::new(input);
        ctrl.start();
        ctrl.start();
        drain(&mut ctrl, &mut rx);
        ctrl.start();
        assert_eq!(monitor.starts(), 1);

        ctrl.stop();
        ctrl.stop();
        assert_eq!(monitor.stops(), 1);
    }

    #[test]
    fn start_failure_is_reported_once() {
        let input = ScriptedInput::failing("no camera");
        let (mut ctrl, mut rx) = CaptureController::new(input);
        ctrl.start();
        let updates = drain(&mut ctrl, &mut rx);
        assert_eq!(
            updates,
            vec![CaptureUpdate::Failed(CaptureError::Unavailable("no camera".into()))]
        );
        assert_eq!(ctrl.state(), CaptureState::Idle);
    }

    #[test]
    fn drop_releases_input() {
        let input = ScriptedInput::new(&[]);
        let monitor = input.monitor();
        {
            let (mut ctrl, _rx) = CaptureController::new(input);
            ctrl.start();
        }
        assert_eq!(monitor.stops(), 1);
    }
}
