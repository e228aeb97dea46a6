use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{EventSink, ScanInput};

#[derive(Default)]
struct Shared {
    starts: AtomicUsize,
    stops: AtomicUsize,
    sink: Mutex<Option<EventSink>>,
}

/// Input that replays a fixed list of tokens on every start.
pub struct ScriptedInput {
    tokens: Vec<String>,
    failure: Option<String>,
    shared: Arc<Shared>,
}

/// Test-side view of a [`ScriptedInput`].
#[derive(Clone)]
pub struct ScriptMonitor(Arc<Shared>);

impl ScriptedInput {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            failure: None,
            shared: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new(&[])
        }
    }

    pub fn monitor(&self) -> ScriptMonitor {
        ScriptMonitor(self.shared.clone())
    }
}

impl ScriptMonitor {
    pub fn starts(&self) -> usize {
        self.0.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.0.stops.load(Ordering::SeqCst)
    }

    /// Sink handed out by the latest start.
    pub fn sink(&self) -> Option<EventSink> {
        self.0.sink.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ScanInput for ScriptedInput {
    fn name(&self) -> &str {
        "scripted"
    }

    fn start(&mut self, sink: EventSink) {
        self.shared.starts.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(reason) => sink.failed(reason.clone()),
            None => {
                sink.acquired();
                for token in &self.tokens {
                    sink.decoded(token.clone());
                }
            }
        }
        *self.shared.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    fn stop(&mut self) {
        self.shared.stops.fetch_add(1, Ordering::SeqCst);
        let sink = self.shared.sink.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(sink) = sink {
            sink.released();
        }
    }
}
