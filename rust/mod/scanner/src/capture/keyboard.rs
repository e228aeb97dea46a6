//! Keyboard-wedge scanners.
//!
//! Handheld scanners in wedge mode type the code followed by Enter, so a
//! scan is just a line on stdin. The same stream carries the screen
//! commands, which start with `:`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{EventSink, ScanInput};
use crate::screen::Command;

/// Wedge input. Tokens are pushed in through a [`WedgeFeed`].
#[derive(Default)]
pub struct KeyboardWedge {
    sink: Arc<Mutex<Option<EventSink>>>,
}

/// Sending half of a [`KeyboardWedge`]. Lines fed while the wedge is
/// stopped go nowhere.
#[derive(Clone)]
pub struct WedgeFeed {
    sink: Arc<Mutex<Option<EventSink>>>,
}

fn slot(sink: &Mutex<Option<EventSink>>) -> MutexGuard<'_, Option<EventSink>> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

impl KeyboardWedge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self) -> WedgeFeed {
        WedgeFeed {
            sink: self.sink.clone(),
        }
    }
}

impl WedgeFeed {
    pub fn feed(&self, token: &str) {
        if let Some(sink) = slot(&self.sink).as_ref() {
            sink.decoded(token);
        }
    }
}

impl ScanInput for KeyboardWedge {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn start(&mut self, sink: EventSink) {
        sink.acquired();
        *slot(&self.sink) = Some(sink);
    }

    fn stop(&mut self) {
        if let Some(sink) = slot(&self.sink).take() {
            sink.released();
        }
    }
}

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Empty,
    Token(String),
    Command(Command),
    Unknown(String),
}

pub fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Line::Token(line.to_string());
    };

    let (verb, arg) = match rest.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (rest, ""),
    };
    let cmd = match (verb, arg) {
        ("units" | "l", "") => Command::ListUnits,
        ("unit" | "u", key) if !key.is_empty() => Command::SelectUnit(key.to_string()),
        ("deselect" | "d", "") => Command::Deselect,
        ("reset" | "r", "") => Command::Reset,
        ("missing" | "m", "") => Command::ShowMissing,
        ("finalize" | "f", "") => Command::Finalize,
        ("quit" | "q", "") => Command::Quit,
        ("help" | "h" | "?", "") => Command::Help,
        _ => return Line::Unknown(line.to_string()),
    };
    Line::Command(cmd)
}

/// Read stdin line by line, routing commands to `commands` and everything
/// else to `feed`. Without a feed, typed codes are dropped. Ends on EOF,
/// which is sent as [`Command::Quit`].
pub fn spawn_stdin_reader(
    feed: Option<WedgeFeed>,
    commands: mpsc::UnboundedSender<Command>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("stdin: {}", e);
                    break;
                }
            };
            let routed = match parse_line(&line) {
                Line::Empty => Ok(()),
                Line::Token(token) => {
                    match &feed {
                        Some(feed) => feed.feed(&token),
                        None => tracing::debug!(%token, "typed code ignored, reading from device"),
                    }
                    Ok(())
                }
                Line::Command(cmd) => commands.send(cmd),
                Line::Unknown(text) => {
                    tracing::debug!(line = %text, "unknown command");
                    commands.send(Command::Help)
                }
            };
            if routed.is_err() {
                return;
            }
        }
        let _ = commands.send(Command::Quit);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureController, CaptureEvent};

    #[test]
    fn lines_route_to_tokens_and_commands() {
        assert_eq!(parse_line("  "), Line::Empty);
        assert_eq!(parse_line(" NB01 \r"), Line::Token("NB01".into()));
        assert_eq!(parse_line(":u UM 2"), Line::Command(Command::SelectUnit("UM 2".into())));
        assert_eq!(parse_line(":reset"), Line::Command(Command::Reset));
        assert_eq!(parse_line(":q"), Line::Command(Command::Quit));
        assert_eq!(parse_line(":m"), Line::Command(Command::ShowMissing));
        assert_eq!(parse_line(":unit"), Line::Unknown(":unit".into()));
        assert_eq!(parse_line(":reset now"), Line::Unknown(":reset now".into()));
    }

    #[test]
    fn feed_reaches_only_running_wedge() {
        let wedge = KeyboardWedge::new();
        let feed = wedge.feed();
        let (mut ctrl, mut rx) = CaptureController::new(wedge);

        feed.feed("EARLY");
        assert!(rx.try_recv().is_err());

        ctrl.start();
        feed.feed("NB01");
        ctrl.stop();
        feed.feed("LATE");

        let events: Vec<CaptureEvent> =
            std::iter::from_fn(|| rx.try_recv().ok()).map(|s| s.event).collect();
        assert_eq!(
            events,
            vec![
                CaptureEvent::Acquired,
                CaptureEvent::Decoded("NB01".into()),
                CaptureEvent::Released,
            ]
        );
    }
}
