//! The reconciliation screen.
//!
//! Owns the roster, the session and the capture. UI commands and capture
//! signals are handled one at a time, so a token's classification and its
//! feedback are complete before the next event is looked at.

use std::fmt;

use inventory::model::{ScannerData, UnitRef};
use tokio::sync::mpsc;

use crate::capture::{CaptureController, CaptureState, CaptureUpdate, ScanInput, Signal};
use crate::error::ScanError;
use crate::feedback::{Feedback, Level};
use crate::roster::RosterLoader;
use crate::session::{Counts, ScanOutcome, ScanSession};

/// UI actions on the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListUnits,
    /// Unit id or name.
    SelectUnit(String),
    Deselect,
    Reset,
    ShowMissing,
    Finalize,
    Help,
    Quit,
}

/// End-of-count figures. Shown, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSummary {
    pub unit: UnitRef,
    pub expected: usize,
    pub scanned: Vec<String>,
    pub missing: Vec<String>,
}

impl fmt::Display for CountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} notebooks scanned, {} missing",
            self.unit.name,
            self.scanned.len(),
            self.expected,
            self.missing.len()
        )
    }
}

const HELP: &[&str] = &[
    ":units          list mobile units",
    ":unit <id|name> start counting a unit",
    ":deselect       stop counting",
    ":missing        list notebooks not scanned yet",
    ":reset          restart the count",
    ":finalize       show the count summary",
    ":quit           leave",
    "anything else is read as a scanned code",
];

pub struct ReconciliationScreen<I: ScanInput> {
    loader: RosterLoader,
    unit: Option<UnitRef>,
    session: ScanSession,
    capture: CaptureController<I>,
    signals: mpsc::UnboundedReceiver<Signal>,
    feedback: Feedback,
}

impl<I: ScanInput> ReconciliationScreen<I> {
    pub fn new(input: I, feedback: Feedback) -> Self {
        let (capture, signals) = CaptureController::new(input);
        Self {
            loader: RosterLoader::Loading,
            unit: None,
            session: ScanSession::new(),
            capture,
            signals,
            feedback,
        }
    }

    /// Settle the roster feed. A failure is reported once and leaves unit
    /// selection disabled.
    pub fn load<E: fmt::Display>(&mut self, result: Result<ScannerData, E>) {
        self.loader = RosterLoader::settle(result);
        match &self.loader {
            RosterLoader::Ready(data) => tracing::debug!(
                units = data.mobile_units.len(),
                notebooks = data.notebooks.len(),
                "roster loaded"
            ),
            RosterLoader::Failed(reason) => {
                let message = format!("could not load mobile units: {}", reason);
                self.feedback.notify(Level::Error, &message);
            }
            RosterLoader::Loading => {}
        }
    }

    pub fn loader(&self) -> &RosterLoader {
        &self.loader
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn unit(&self) -> Option<&UnitRef> {
        self.unit.as_ref()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn counts(&self) -> Counts {
        self.session.counts()
    }

    /// Select a unit: load its roster, clear the count, start capture.
    pub fn select_unit(&mut self, key: &str) -> Result<(), ScanError> {
        let roster = self.loader.roster(key)?;
        let unit = roster.unit.clone();
        let expected = roster.ids.len();
        self.session.select(roster);
        tracing::debug!(unit = %unit.id, expected, "unit selected");
        self.feedback.notify(
            Level::Info,
            &format!("counting {}: {} notebooks expected", unit.name, expected),
        );
        self.unit = Some(unit);
        self.capture.start();
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.capture.stop();
        self.session.deselect();
        self.unit = None;
    }

    pub fn reset(&mut self) -> Result<(), ScanError> {
        if self.unit.is_none() {
            return Err(ScanError::NoUnitSelected);
        }
        self.session.reset();
        self.feedback.notify(Level::Success, "count restarted");
        Ok(())
    }

    /// Classify one token and emit its feedback.
    pub fn scan(&mut self, token: &str) -> ScanOutcome {
        let outcome = self.session.process(token);
        let counts = self.session.counts();
        tracing::debug!(?outcome, scanned = counts.scanned, missing = counts.missing, "scan");
        self.feedback.outcome(&outcome);
        outcome
    }

    pub fn missing(&self) -> Result<Vec<String>, ScanError> {
        if self.unit.is_none() {
            return Err(ScanError::NoUnitSelected);
        }
        Ok(self.session.missing())
    }

    pub fn finalize(&self) -> Result<CountSummary, ScanError> {
        let unit = self.unit.clone().ok_or(ScanError::NoUnitSelected)?;
        Ok(CountSummary {
            unit,
            expected: self.session.roster().len(),
            scanned: self.session.scanned().to_vec(),
            missing: self.session.missing(),
        })
    }

    /// Apply a capture signal. Returns the outcome when it carried a token.
    pub fn handle_signal(&mut self, signal: Signal) -> Option<ScanOutcome> {
        match self.capture.handle(signal)? {
            CaptureUpdate::Acquired => {
                self.feedback.notify(Level::Info, "scanner ready");
                None
            }
            CaptureUpdate::Token(token) => Some(self.scan(&token)),
            CaptureUpdate::Failed(e) => {
                tracing::debug!("capture failed: {}", e);
                self.feedback.notify(Level::Error, &e.to_string());
                None
            }
        }
    }

    /// Apply a UI command. Returns `false` once the screen should close.
    pub fn apply(&mut self, cmd: Command) -> bool {
        let result = match cmd {
            Command::Quit => return false,
            Command::Help => {
                let lines: Vec<String> = HELP.iter().map(|l| l.to_string()).collect();
                self.feedback.report("commands", &lines);
                Ok(())
            }
            Command::ListUnits => self.list_units(),
            Command::SelectUnit(key) => self.select_unit(&key),
            Command::Deselect => {
                self.deselect();
                Ok(())
            }
            Command::Reset => self.reset(),
            Command::ShowMissing => self.missing().map(|missing| {
                let title = format!("missing ({} of {})", missing.len(), self.session.roster().len());
                self.feedback.report(&title, &missing);
            }),
            Command::Finalize => self.finalize().map(|summary| {
                self.feedback.report("count finished", &[summary.to_string()]);
            }),
        };
        if let Err(e) = result {
            self.feedback.notify(Level::Warning, &e.to_string());
        }
        true
    }

    fn list_units(&mut self) -> Result<(), ScanError> {
        self.loader.ready()?;
        let lines: Vec<String> = self
            .loader
            .units()
            .into_iter()
            .map(|u| format!("{}  {}", u.id, u.name))
            .collect();
        self.feedback.report("mobile units", &lines);
        Ok(())
    }

    /// Process commands and capture signals until `Quit` or until the
    /// command channel closes, then release the capture.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                biased;
                cmd = commands.recv() => match cmd {
                    Some(cmd) => {
                        if !self.apply(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(signal) = self.signals.recv() => {
                    self.handle_signal(signal);
                }
            }
        }
        self.close();
    }

    /// Release the capture. Also done on drop.
    pub fn close(&mut self) {
        self.capture.close();
    }
}
