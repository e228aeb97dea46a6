//! Scan reconciliation engine.
//!
//! A technician picks a mobile unit; the unit's notebooks become the
//! expected roster, and every decoded scan token is classified against it
//! as accepted, duplicate or foreign.
//!
//! - [`roster`]: one-shot roster snapshot and unit selection guard
//! - [`session`]: the pure classification state machine
//! - [`capture`]: scan-input devices behind an explicit start/stop state machine
//! - [`feedback`]: toasts and tones
//! - [`screen`]: the event loop tying them together

pub mod capture;
pub mod error;
pub mod feedback;
pub mod roster;
pub mod screen;
pub mod session;

pub use capture::{CaptureController, CaptureState, ScanInput};
pub use error::{AudioError, CaptureError, ScanError};
pub use feedback::{AudioService, Feedback, Level, Notifier, Tone, ToneSink};
pub use roster::{Roster, RosterLoader};
pub use screen::{Command, CountSummary, ReconciliationScreen};
pub use session::{Counts, ScanOutcome, ScanSession};
