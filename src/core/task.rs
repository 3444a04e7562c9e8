//! Transcode task definition.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::core::ExportSettings;
use crate::utils::ImageFormat;

/// One (source, output, format) unit of work.
///
/// The task carries its own copy of the batch settings so it can be moved
/// onto a blocking worker thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeTask {
    /// Path the pixels are decoded from
    pub input_path: PathBuf,
    /// Path the encoded bytes are written to
    pub output_path: PathBuf,
    /// Target format
    pub format: ImageFormat,
    /// Encoding settings of the batch
    pub settings: ExportSettings,
}

impl TranscodeTask {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        format: ImageFormat,
        settings: ExportSettings,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            format,
            settings,
        }
    }
}
