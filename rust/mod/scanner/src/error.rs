use thiserror::Error;

/// Errors of the reconciliation screen. None of them end the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("the roster is still loading")]
    RosterLoading,

    #[error("the roster could not be loaded: {0}")]
    RosterUnavailable(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("no unit selected")]
    NoUnitSelected,
}

/// Errors reported by a scan-input device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("scanner unavailable: {0}")]
    Unavailable(String),

    #[error("scanner disconnected: {0}")]
    Disconnected(String),
}

/// Errors opening or driving the audio output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,

    #[error("unsupported sample format {0}")]
    UnsupportedFormat(String),

    #[error("audio device: {0}")]
    Device(String),

    #[error("audio stream: {0}")]
    Stream(String),

    #[error("audio thread: {0}")]
    Thread(String),
}
