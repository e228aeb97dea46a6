//! Per-scan feedback: a short toast and a tone.
//!
//! Feedback never affects the count. A missing audio device only means
//! silence.

mod terminal;
#[cfg(feature = "audio")]
mod synth;

pub use terminal::{BellTone, TerminalNotifier};

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::session::ScanOutcome;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Audible cue per scan outcome. All three are an eighth note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// C5.
    Accept,
    /// C4.
    Duplicate,
    /// A3.
    Foreign,
}

impl Tone {
    pub fn note(&self) -> &'static str {
        match self {
            Tone::Accept => "C5",
            Tone::Duplicate => "C4",
            Tone::Foreign => "A3",
        }
    }

    pub fn frequency(&self) -> f32 {
        match self {
            Tone::Accept => 523.25,
            Tone::Duplicate => 261.63,
            Tone::Foreign => 220.0,
        }
    }

    /// Eighth note at 120 bpm.
    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(250)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.note())
    }
}

/// Toast sink.
pub trait Notifier: Send {
    fn notify(&mut self, level: Level, message: &str);

    /// A titled block of lines, for listings.
    fn report(&mut self, title: &str, lines: &[String]) {
        self.notify(Level::Info, title);
        for line in lines {
            self.notify(Level::Info, line);
        }
    }
}

/// Audio sink. Must not block the caller for the length of the tone.
pub trait ToneSink: Send + Sync {
    fn play(&self, tone: Tone);
}

/// Plays nothing.
pub struct SilentTone;

impl ToneSink for SilentTone {
    fn play(&self, _tone: Tone) {}
}

struct Output {
    sink: Arc<dyn ToneSink>,
    backend: &'static str,
}

/// Audio output owned by whoever runs the screen. The device is opened on
/// first use and shared by every sink handed out afterwards.
pub struct AudioService {
    muted: bool,
    output: OnceLock<Output>,
}

impl AudioService {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            output: OnceLock::new(),
        }
    }

    fn output(&self) -> &Output {
        self.output.get_or_init(|| {
            let output = Self::open(self.muted);
            tracing::debug!(backend = output.backend, "audio output ready");
            output
        })
    }

    fn open(muted: bool) -> Output {
        if muted {
            return Output {
                sink: Arc::new(SilentTone),
                backend: "silent",
            };
        }

        #[cfg(feature = "audio")]
        match synth::SineTone::open() {
            Ok(sine) => {
                return Output {
                    sink: Arc::new(sine),
                    backend: "synth",
                };
            }
            Err(e) => tracing::debug!("audio output unavailable, using terminal bell: {}", e),
        }

        Output {
            sink: Arc::new(BellTone::stdout()),
            backend: "bell",
        }
    }

    pub fn sink(&self) -> Arc<dyn ToneSink> {
        self.output().sink.clone()
    }

    pub fn backend(&self) -> &'static str {
        self.output().backend
    }
}

/// Toast plus tone, as one bundle for the screen.
pub struct Feedback {
    notifier: Box<dyn Notifier>,
    tones: Arc<dyn ToneSink>,
}

impl Feedback {
    pub fn new(notifier: Box<dyn Notifier>, tones: Arc<dyn ToneSink>) -> Self {
        Self { notifier, tones }
    }

    /// Coloured toasts on stdout, tones on `tones`.
    pub fn terminal(tones: Arc<dyn ToneSink>) -> Self {
        Self::new(Box::new(TerminalNotifier::stdout()), tones)
    }

    pub fn notify(&mut self, level: Level, message: &str) {
        self.notifier.notify(level, message);
    }

    pub fn report(&mut self, title: &str, lines: &[String]) {
        self.notifier.report(title, lines);
    }

    /// Toast and tone for a classified token.
    pub fn outcome(&mut self, outcome: &ScanOutcome) {
        let (level, message, tone) = match outcome {
            ScanOutcome::Ignored => return,
            ScanOutcome::Accepted(t) => (Level::Success, format!("{} scanned", t), Tone::Accept),
            ScanOutcome::Duplicate(t) => {
                (Level::Error, format!("{} was already scanned", t), Tone::Duplicate)
            }
            ScanOutcome::Foreign(t) => (
                Level::Error,
                format!("{} does not belong to this unit", t),
                Tone::Foreign,
            ),
        };
        self.notifier.notify(level, &message);
        self.tones.play(tone);
    }
}


#[cfg(test)]
mod tests {
    use super::recording::{Emitted, Recorder};
    use super::*;

    #[test]
    fn tones_are_distinct_pitches() {
        assert_eq!(Tone::Accept.note(), "C5");
        assert_eq!(Tone::Duplicate.note(), "C4");
        assert_eq!(Tone::Foreign.note(), "A3");
        assert!(Tone::Accept.frequency() > Tone::Duplicate.frequency());
        assert!(Tone::Duplicate.frequency() > Tone::Foreign.frequency());
        assert_eq!(Tone::Accept.duration(), Tone::Foreign.duration());
    }

    #[test]
    fn toast_comes_before_tone() {
        let rec = Recorder::default();
        let mut fb = rec.feedback();
        fb.outcome(&ScanOutcome::Accepted("NB01".into()));
        fb.outcome(&ScanOutcome::Foreign("X9".into()));
        fb.outcome(&ScanOutcome::Duplicate("NB01".into()));
        fb.outcome(&ScanOutcome::Ignored);

        assert_eq!(
            rec.take(),
            vec![
                Emitted::Toast(Level::Success, "NB01 scanned".into()),
                Emitted::Tone(Tone::Accept),
                Emitted::Toast(Level::Error, "X9 does not belong to this unit".into()),
                Emitted::Tone(Tone::Foreign),
                Emitted::Toast(Level::Error, "NB01 was already scanned".into()),
                Emitted::Tone(Tone::Duplicate),
            ]
        );
    }

    #[test]
    fn audio_output_is_opened_once() {
        let audio = AudioService::new(false);
        assert!(Arc::ptr_eq(&audio.sink(), &audio.sink()));
        assert!(["synth", "bell"].contains(&audio.backend()));
    }

    #[test]
    fn muted_audio_is_silent() {
        let audio = AudioService::new(true);
        assert_eq!(audio.backend(), "silent");
        assert!(Arc::ptr_eq(&audio.sink(), &audio.sink()));
    }
}
