use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use super::{Level, Notifier, Tone, ToneSink};

fn style(level: Level) -> (Color, &'static str) {
    match level {
        Level::Info => (Color::Cyan, "·"),
        Level::Success => (Color::Green, "✔"),
        Level::Warning => (Color::Yellow, "!"),
        Level::Error => (Color::Red, "✘"),
    }
}

/// Coloured one-line toasts.
pub struct TerminalNotifier<W: Write + Send = Stdout> {
    out: W,
}

impl TerminalNotifier<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, level: Level, message: &str) -> io::Result<()> {
        let (color, icon) = style(level);
        execute!(
            self.out,
            SetForegroundColor(color),
            Print(icon),
            ResetColor,
            Print(format!(" {}\n", message))
        )
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&mut self, level: Level, message: &str) {
        if let Err(e) = self.write(level, message) {
            tracing::debug!("toast dropped: {}", e);
        }
    }

    fn report(&mut self, title: &str, lines: &[String]) {
        let body: String = lines.iter().map(|l| format!("    {}\n", l)).collect();
        let res = execute!(
            self.out,
            SetForegroundColor(Color::Cyan),
            Print(title),
            ResetColor,
            Print(format!("\n{}", body))
        );
        if let Err(e) = res {
            tracing::debug!("report dropped: {}", e);
        }
    }
}

/// Rings the terminal bell: once for an accepted scan, twice for a
/// duplicate, three times for a foreign item.
pub struct BellTone<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl BellTone<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> BellTone<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ToneSink for BellTone<W> {
    fn play(&self, tone: Tone) {
        let rings = match tone {
            Tone::Accept => 1,
            Tone::Duplicate => 2,
            Tone::Foreign => 3,
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = out.write_all(&b"\x07\x07\x07"[..rings]).and_then(|_| out.flush());
    }
}
