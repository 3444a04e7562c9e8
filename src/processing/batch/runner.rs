//! Batch orchestration: file lifecycle around each job, progress and
//! aggregation.
//!
//! Items run one after another; each job's blocking decode/encode work is
//! moved to tokio's blocking pool so the runtime is never stalled. A failed
//! item is recorded and the batch moves on.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{BatchReport, ExportSettings, ItemOutcome, JobConfig, Outcome, TranscodeTask};
use crate::processing::codec::{Codec, ImageCodec};
use crate::processing::job;
use crate::utils::{
    ImageFormat, TranscodeError, TranscodeResult, backup_dir_for, display_name, fs, output_path_for,
};

use super::control::{CancelToken, EventSink};

const OVERWRITES_SOURCE: &str = "output would overwrite source";

/// What happens to an in-place original once its output is written.
enum Retire {
    /// Original already lives in the backup folder, or must stay put
    Keep,
    /// Delete the original after a successful encode
    Delete,
}

/// Runs batches against a codec.
#[derive(Clone)]
pub struct BatchRunner {
    codec: Arc<dyn Codec>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(Arc::new(ImageCodec))
    }
}

impl BatchRunner {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Runs one job on the blocking pool. A panicking job becomes a failed outcome.
    async fn execute(&self, task: TranscodeTask) -> Outcome {
        let codec = Arc::clone(&self.codec);
        tokio::task::spawn_blocking(move || job::run(codec.as_ref(), &task))
            .await
            .unwrap_or_else(|e| Outcome::failed(format!("Task panicked: {e}")))
    }

    /// Multi-destination export: every source × every format into `output_dir`.
    ///
    /// One source may partially succeed; each pair is reported on its own.
    pub async fn run_export(
        &self,
        sources: &[PathBuf],
        output_dir: &Path,
        settings: &ExportSettings,
        events: &EventSink,
        cancel: &CancelToken,
    ) -> BatchReport {
        let total = sources.len() * settings.formats.len();
        info!(
            "Exporting {} source(s) as {:?} into {}",
            sources.len(),
            settings.formats,
            output_dir.display()
        );
        events.started(total);

        let mut items = Vec::with_capacity(total);
        let mut cancelled = false;

        'sources: for source in sources {
            for &format in &settings.formats {
                if cancel.is_cancelled() {
                    events.log("Stopped by user.");
                    cancelled = true;
                    break 'sources;
                }

                let output = output_path_for(output_dir, source, format);
                let outcome = if fs::same_path(source, &output) {
                    Outcome::skipped(OVERWRITES_SOURCE)
                } else {
                    let task = TranscodeTask::new(source, &output, format, settings.clone());
                    self.execute(task).await
                };
                log_outcome(events, source, &output, format, &outcome);

                items.push(ItemOutcome {
                    source: source.clone(),
                    output,
                    format,
                    outcome,
                });
                events.progress(items.len(), total);
            }
        }

        finish(items, cancelled, events)
    }

    /// In-place conversion of every matching file in `config.folder`.
    ///
    /// Fails only when the folder cannot be listed or the backup folder cannot
    /// be created; per-file problems end up in the report.
    pub async fn run_in_place(
        &self,
        config: &JobConfig,
        events: &EventSink,
        cancel: &CancelToken,
    ) -> TranscodeResult<BatchReport> {
        let folder = config.folder.as_path();
        if !folder.is_dir() {
            return Err(TranscodeError::SourceDirectory(folder.to_path_buf()));
        }

        let ext = config.source_extension.trim_start_matches('.');
        let sources = fs::list_files_with_extension(folder, ext)?;
        let total = sources.len();
        events.started(total);

        if total == 0 {
            events.log(format!("No {} files found in the selected folder.", ext.to_uppercase()));
            return Ok(finish(Vec::new(), false, events));
        }

        events.log(format!("Mode: {}", config.mode_description()));

        let backup_dir = if config.keep_backup {
            let dir = resolve_backup_dir(folder, ext)?;
            fs::ensure_dir(&dir)?;
            events.log(format!("Backup folder: {}", dir.display()));
            Some(dir)
        } else {
            None
        };

        let settings = config.export_settings();
        let mut items = Vec::with_capacity(total);
        let mut cancelled = false;

        for source in &sources {
            if cancel.is_cancelled() {
                events.log("Stopped by user.");
                cancelled = true;
                break;
            }

            let output = output_path_for(folder, source, config.target);
            let outcome = self
                .convert_in_place(source, &output, config, backup_dir.as_deref(), &settings, events)
                .await;

            items.push(ItemOutcome {
                source: source.clone(),
                output,
                format: config.target,
                outcome,
            });
            events.progress(items.len(), total);
        }

        Ok(finish(items, cancelled, events))
    }

    async fn convert_in_place(
        &self,
        source: &Path,
        output: &Path,
        config: &JobConfig,
        backup_dir: Option<&Path>,
        settings: &ExportSettings,
        events: &EventSink,
    ) -> Outcome {
        let name = display_name(source);
        let output_name = display_name(output);

        if !config.overwrite && output.exists() {
            events.log(format!("Skip (already exists): {output_name}"));
            return Outcome::skipped("already exists");
        }

        let (read_from, retire) = match backup_dir {
            Some(dir) => {
                let backup = dir.join(&name);
                if backup.exists() {
                    // An earlier backup is never replaced; the current
                    // original stays where it is.
                    if output == source {
                        events.log(format!("Skip (backup already exists): {name}"));
                        return Outcome::skipped("backup already exists");
                    }
                    warn!("Backup {} already exists, keeping original in place", backup.display());
                    (source.to_path_buf(), Retire::Keep)
                } else {
                    if let Err(e) = fs::move_file(source, &backup) {
                        events.log(format!("Failed: {name} -> {e}"));
                        return Outcome::failed(e.to_string());
                    }
                    debug!("Moved {} to {}", source.display(), backup.display());
                    (backup, Retire::Keep)
                }
            }
            None => (source.to_path_buf(), Retire::Delete),
        };

        let task = TranscodeTask::new(read_from, output, config.target, settings.clone());
        let outcome = self.execute(task).await;
        log_outcome(events, source, output, config.target, &outcome);

        if outcome.is_converted() {
            if let Retire::Delete = retire {
                if let Err(e) = fs::remove_file(source) {
                    warn!("Failed to delete original {}: {}", source.display(), e);
                    events.log(format!("Warn: failed to delete original {name}: {e}"));
                }
            }
        }

        outcome
    }
}

/// Backup folder for `folder`, resolving relative names like `.` first.
fn resolve_backup_dir(folder: &Path, ext: &str) -> TranscodeResult<PathBuf> {
    if let Some(dir) = backup_dir_for(folder, ext) {
        return Ok(dir);
    }
    let absolute = std::fs::canonicalize(folder)?;
    backup_dir_for(&absolute, ext)
        .ok_or_else(|| TranscodeError::io(format!("Cannot place a backup folder next to {}", absolute.display())))
}

fn log_outcome(events: &EventSink, source: &Path, output: &Path, format: ImageFormat, outcome: &Outcome) {
    let name = display_name(source);
    match outcome {
        Outcome::Converted { .. } => {
            events.log(format!("Converted: {name} → {}", display_name(output)));
        }
        Outcome::Failed { error } => {
            warn!("{} → {} failed: {}", source.display(), format, error);
            events.log(format!("Failed: {name} -> {error}"));
        }
        Outcome::Skipped { reason } => {
            events.log(format!("Skip ({reason}): {}", display_name(output)));
        }
    }
}

fn finish(items: Vec<ItemOutcome>, cancelled: bool, events: &EventSink) -> BatchReport {
    let report = BatchReport::from_items(items, cancelled);
    if report.has_failures() {
        warn!(
            "Batch completed with {} failed item(s) out of {}",
            report.failed, report.attempted
        );
    } else {
        info!("Batch completed: {} converted, {} skipped", report.converted, report.skipped);
    }
    events.complete(&report);
    report
}
