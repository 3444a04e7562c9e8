//! Core types shared by the processing pipeline and its callers.
//!
//! - [`ExportSettings`]: encoding options for a batch
//! - [`JobConfig`]: in-place folder conversion options
//! - [`TranscodeTask`]: one (source, output, format) unit
//! - [`Outcome`] / [`BatchReport`]: per-item and aggregate results
//! - [`BatchEvent`]: progress, log and completion events

mod types;
mod task;
mod progress;

pub use types::{
    BatchReport, ExportSettings, ItemOutcome, JobConfig, Outcome, NO_ALPHA_QUALITY,
};
pub use task::TranscodeTask;
pub use progress::{BatchEvent, ProgressUpdate};
