//! Entry points for starting, observing and cancelling batches.

use std::path::PathBuf;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::{BatchEvent, BatchReport, ExportSettings, JobConfig};
use crate::processing::{BatchRunner, CancelToken, Codec, EventSink, ImageCodec};
use crate::utils::{TranscodeError, TranscodeResult, validate_export, validate_job_config};

/// What a batch should do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum BatchRequest {
    /// Convert a folder's originals next to themselves
    InPlace(JobConfig),
    /// Export arbitrary sources into one output directory
    #[serde(rename_all = "camelCase")]
    Export {
        sources: Vec<PathBuf>,
        output_dir: PathBuf,
        settings: ExportSettings,
    },
}

/// A running batch.
///
/// Events can be read with [`BatchHandle::next_event`] while the batch runs;
/// [`BatchHandle::wait`] returns the final report.
pub struct BatchHandle {
    events: UnboundedReceiver<BatchEvent>,
    cancel: CancelToken,
    task: JoinHandle<TranscodeResult<BatchReport>>,
}

impl BatchHandle {
    /// Requests a cooperative stop before the next item.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this batch, for handing to a signal handler.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Next event, or `None` once the batch finished and all events were read.
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Waits for the batch and returns its report.
    pub async fn wait(self) -> TranscodeResult<BatchReport> {
        self.task
            .await
            .map_err(|e| TranscodeError::processing(format!("Batch worker failed: {e}")))?
    }
}

/// Starts `request` with the default codec. Must be called inside a tokio runtime.
pub fn start_batch(request: BatchRequest) -> TranscodeResult<BatchHandle> {
    start_batch_with_codec(request, Arc::new(ImageCodec))
}

/// Validates `request` and starts it on a background task.
///
/// Configuration errors (no sources, bad settings, missing in-place folder)
/// are returned here and no work starts.
pub fn start_batch_with_codec(request: BatchRequest, codec: Arc<dyn Codec>) -> TranscodeResult<BatchHandle> {
    let request = match request {
        BatchRequest::InPlace(config) => {
            validate_job_config(&config)?;
            BatchRequest::InPlace(config)
        }
        BatchRequest::Export { sources, output_dir, settings } => {
            let settings = settings.normalized();
            validate_export(&sources, &settings)?;
            BatchRequest::Export { sources, output_dir, settings }
        }
    };

    let (sender, events) = mpsc::unbounded_channel();
    let sink = EventSink::new(sender);
    let cancel = CancelToken::new();
    let runner = BatchRunner::new(codec);
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        match request {
            BatchRequest::InPlace(config) => {
                debug!("Starting in-place batch in {}", config.folder.display());
                runner.run_in_place(&config, &sink, &token).await
            }
            BatchRequest::Export { sources, output_dir, settings } => {
                debug!("Starting export batch of {} source(s)", sources.len());
                Ok(runner.run_export(&sources, &output_dir, &settings, &sink, &token).await)
            }
        }
    });

    Ok(BatchHandle { events, cancel, task })
}

/// Converts a folder in place and waits for the report.
pub async fn convert_folder(config: JobConfig) -> TranscodeResult<BatchReport> {
    start_batch(BatchRequest::InPlace(config))?.wait().await
}

/// Exports `sources` into `output_dir` and waits for the report.
pub async fn export_images(
    sources: Vec<PathBuf>,
    output_dir: PathBuf,
    settings: ExportSettings,
) -> TranscodeResult<BatchReport> {
    start_batch(BatchRequest::Export { sources, output_dir, settings })?.wait().await
}
