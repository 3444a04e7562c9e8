use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::core::{BatchEvent, BatchReport, ProgressUpdate};

/// Cooperative stop signal, checked before each item is dispatched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    stopped: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop. Idempotent; harmless once the batch has finished.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Sending half of a batch's event stream.
///
/// Sends never fail: a caller that dropped the receiver simply stops
/// getting events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<BatchEvent>>,
}

impl EventSink {
    pub fn new(sender: UnboundedSender<BatchEvent>) -> Self {
        Self { sender: Some(sender) }
    }

    /// A sink that discards everything.
    pub fn disconnected() -> Self {
        Self::default()
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }

    pub fn started(&self, total: usize) {
        self.emit(BatchEvent::Started { total });
    }

    pub fn progress(&self, completed: usize, total: usize) {
        self.emit(BatchEvent::Progress(ProgressUpdate::new(completed, total)));
    }

    /// Emits a status line and mirrors it to the tracing log.
    pub fn log(&self, line: impl Into<String>) {
        let line = line.into();
        info!("{line}");
        self.emit(BatchEvent::Log(line));
    }

    pub fn complete(&self, report: &BatchReport) {
        self.emit(BatchEvent::Complete(report.clone()));
    }
}
