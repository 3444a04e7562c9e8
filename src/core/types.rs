//! Core types for export settings, batch configuration and results.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::utils::ImageFormat;

/// Encoding settings shared by every job of a batch.
///
/// Built once per batch and moved into the runner; nothing mutates it after
/// the batch starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Target formats; an empty list is normalised to PNG
    pub formats: Vec<ImageFormat>,
    /// Percentage scale (1-100, 100 = unchanged)
    pub resize_percent: u32,
    /// Bounding box width after scaling (0 = unconstrained)
    pub max_width: u32,
    /// Bounding box height after scaling (0 = unconstrained)
    pub max_height: u32,
    /// Use maximum PNG compression
    pub png_optimize: bool,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Encode WebP losslessly (quality ignored)
    pub webp_lossless: bool,
    /// Lossy WebP quality (1-100)
    pub webp_quality: u8,
    /// Force opaque RGB output for every format
    pub drop_alpha: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            formats: vec![ImageFormat::PNG],
            resize_percent: 100,
            max_width: 0,
            max_height: 0,
            png_optimize: true,
            jpeg_quality: 90,
            webp_lossless: false,
            webp_quality: 90,
            drop_alpha: false,
        }
    }
}

impl ExportSettings {
    /// Settings targeting `formats` with every other option at its default.
    pub fn with_formats(formats: impl IntoIterator<Item = ImageFormat>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
            ..Self::default()
        }
        .normalized()
    }

    /// Returns the settings with duplicate formats removed (first occurrence
    /// wins) and an empty format list replaced by PNG.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.formats.len());
        for format in self.formats {
            if !seen.contains(&format) {
                seen.push(format);
            }
        }
        if seen.is_empty() {
            seen.push(ImageFormat::PNG);
        }
        self.formats = seen;
        self
    }
}

/// Fixed quality for lossy output when `no_alpha` is set.
pub const NO_ALPHA_QUALITY: u8 = 90;

/// Configuration for in-place folder conversion.
///
/// Originals matching `source_extension` are re-encoded as `target` next to
/// themselves and retired into a sibling backup folder or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfig {
    /// Folder holding the originals
    pub folder: PathBuf,
    /// Move originals to `<folder>_<EXT>` instead of deleting them
    pub keep_backup: bool,
    /// Re-encode even if the output already exists
    pub overwrite: bool,
    /// Drop transparency and encode lossy at a fixed quality of 90
    pub no_alpha: bool,
    /// Extension of the originals (without dot)
    pub source_extension: String,
    /// Format the originals are converted to
    pub target: ImageFormat,
    /// Optional bounding box for the output (0 = unconstrained)
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::new(),
            keep_backup: true,
            overwrite: false,
            no_alpha: false,
            source_extension: "png".to_string(),
            target: ImageFormat::WebP,
            max_width: 0,
            max_height: 0,
        }
    }
}

impl JobConfig {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    /// Export settings equivalent to this in-place configuration.
    ///
    /// WebP is lossless with alpha preserved unless `no_alpha`, which forces
    /// lossy opaque RGB at quality 90. JPEG is always encoded at quality 90.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            formats: vec![self.target],
            resize_percent: 100,
            max_width: self.max_width,
            max_height: self.max_height,
            png_optimize: true,
            jpeg_quality: NO_ALPHA_QUALITY,
            webp_lossless: !self.no_alpha,
            webp_quality: NO_ALPHA_QUALITY,
            drop_alpha: self.no_alpha,
        }
    }

    /// Human-readable description of the encode mode.
    pub fn mode_description(&self) -> String {
        match self.target {
            ImageFormat::WebP if self.no_alpha => {
                format!("LOSSY (no transparency, q={NO_ALPHA_QUALITY})")
            }
            ImageFormat::WebP => "LOSSLESS (preserve transparency)".to_string(),
            ImageFormat::JPEG => format!("JPEG (no transparency, q={NO_ALPHA_QUALITY})"),
            ImageFormat::PNG if self.no_alpha => "PNG (no transparency)".to_string(),
            ImageFormat::PNG => "PNG (preserve transparency)".to_string(),
        }
    }
}

/// Result of one (source, format) unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    /// Output written
    Converted { bytes_written: u64 },
    /// Nothing attempted
    Skipped { reason: String },
    /// Attempted and failed; carries the original cause
    Failed { error: String },
}

impl Outcome {
    pub fn converted(bytes_written: u64) -> Self {
        Self::Converted { bytes_written }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped { reason: reason.into() }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// An outcome attributed to the pair that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: ImageFormat,
    pub outcome: Outcome,
}

/// Aggregate result of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Per-item results in dispatch order
    pub items: Vec<ItemOutcome>,
    /// Items dispatched (skipped ones included)
    pub attempted: usize,
    pub converted: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Sum of bytes written by converted items
    pub bytes_written: u64,
    /// The batch stopped early on request
    pub cancelled: bool,
}

impl BatchReport {
    /// Builds the report, deriving every counter from `items`.
    pub fn from_items(items: Vec<ItemOutcome>, cancelled: bool) -> Self {
        let mut report = Self {
            attempted: items.len(),
            cancelled,
            ..Self::default()
        };
        for item in &items {
            match &item.outcome {
                Outcome::Converted { bytes_written } => {
                    report.converted += 1;
                    report.bytes_written += bytes_written;
                }
                Outcome::Skipped { .. } => report.skipped += 1,
                Outcome::Failed { .. } => report.failed += 1,
            }
        }
        report.items = items;
        report
    }

    /// Failed items only.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|item| item.outcome.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        let mut line = format!("Done. Converted {} file(s).", self.converted);
        if self.skipped > 0 {
            line.push_str(&format!(" Skipped {}.", self.skipped));
        }
        if self.failed > 0 {
            line.push_str(&format!(" Failed {}.", self.failed));
        }
        if self.cancelled {
            line.push_str(" Stopped before completion.");
        }
        line
    }
}
