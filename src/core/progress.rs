use serde::{Deserialize, Serialize};
use crate::core::BatchReport;

/// Progress update emitted after every item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Number of completed items
    pub completed: usize,
    /// Total number of items in the batch
    pub total: usize,
}

impl ProgressUpdate {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Progress percentage (0-100)
    pub fn percentage(&self) -> usize {
        if self.total > 0 {
            (self.completed * 100) / self.total
        } else {
            0
        }
    }
}

/// Event stream of a running batch.
///
/// A batch emits `Started`, then interleaved `Log` and `Progress` events, and
/// finally exactly one `Complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BatchEvent {
    /// The batch is about to dispatch `total` items
    Started { total: usize },
    /// One more item finished
    Progress(ProgressUpdate),
    /// Human-readable status line
    Log(String),
    /// Final report
    Complete(BatchReport),
}
