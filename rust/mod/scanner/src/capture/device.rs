use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

use super::{EventSink, ScanInput};

/// Scanner exposed as a line-oriented device node (a serial or HID-POS
/// scanner, or a FIFO). Opened on start, closed on stop.
///
/// Starting needs a running tokio runtime.
pub struct DeviceInput {
    path: PathBuf,
    name: String,
    stop: Option<oneshot::Sender<()>>,
}

impl DeviceInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("device {}", path.display());
        Self {
            path,
            name,
            stop: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanInput for DeviceInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, sink: EventSink) {
        let (stop_tx, stop_rx) = oneshot::channel();
        // A previous reader still running sees its sender dropped and closes.
        self.stop = Some(stop_tx);
        tokio::spawn(read_device(self.path.clone(), sink, stop_rx));
    }

    fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

async fn read_device(path: PathBuf, sink: EventSink, mut stop: oneshot::Receiver<()>) {
    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            sink.failed(format!("{}: {}", path.display(), e));
            return;
        }
    };
    tracing::debug!(path = %path.display(), generation = sink.generation(), "scanner device opened");
    sink.acquired();

    let mut lines = BufReader::new(file).lines();
    loop {
        tokio::select! {
            _ = &mut stop => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let token = line.trim();
                    if !token.is_empty() {
                        sink.decoded(token);
                    }
                }
                Ok(None) => {
                    sink.failed(format!("{}: device closed", path.display()));
                    return;
                }
                Err(e) => {
                    sink.failed(format!("{}: {}", path.display(), e));
                    return;
                }
            },
        }
    }

    drop(lines);
    tracing::debug!(path = %path.display(), "scanner device closed");
    sink.released();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::capture::{CaptureController, CaptureEvent, CaptureUpdate};
    use crate::CaptureError;

    #[tokio::test]
    async fn reads_tokens_until_end_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NB01\n\n  NB02 ").unwrap();

        let (mut ctrl, mut rx) = CaptureController::new(DeviceInput::new(file.path()));
        ctrl.start();

        let mut updates = Vec::new();
        while let Some(signal) = rx.recv().await {
            let failed = matches!(signal.event, CaptureEvent::Failed(_));
            if let Some(update) = ctrl.handle(signal) {
                updates.push(update);
            }
            if failed {
                break;
            }
        }

        assert_eq!(updates[0], CaptureUpdate::Acquired);
        assert_eq!(updates[1], CaptureUpdate::Token("NB01".into()));
        assert_eq!(updates[2], CaptureUpdate::Token("NB02".into()));
        assert!(matches!(updates[3], CaptureUpdate::Failed(CaptureError::Disconnected(_))));
    }

    #[tokio::test]
    async fn missing_device_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctrl, mut rx) = CaptureController::new(DeviceInput::new(dir.path().join("ttyACM9")));
        ctrl.start();
        let signal = rx.recv().await.unwrap();
        assert!(matches!(
            ctrl.handle(signal),
            Some(CaptureUpdate::Failed(CaptureError::Unavailable(_)))
        ));
    }
}
