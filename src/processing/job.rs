//! A single decode → normalize → resize → encode → write unit.
//!
//! Jobs never touch their source file: they read it, and they write exactly
//! one output file after encoding has succeeded. Retiring originals is the
//! batch runner's business.

use tracing::debug;

use crate::core::{ExportSettings, Outcome, TranscodeTask};
use crate::utils::{ImageFormat, TranscodeError, TranscodeResult, display_name, fs};
use super::codec::{Codec, ImageHandle};
use super::policy::EncodePolicy;
use super::resize::{compute_resize, resample};

/// Runs `task` to completion and reports its outcome. Never fails.
pub fn run(codec: &dyn Codec, task: &TranscodeTask) -> Outcome {
    match transcode(codec, task) {
        Ok(bytes_written) => Outcome::converted(bytes_written),
        Err(e) => Outcome::failed(e.to_string()),
    }
}

/// Transcodes `task`, returning the number of bytes written.
pub fn transcode(codec: &dyn Codec, task: &TranscodeTask) -> TranscodeResult<u64> {
    if fs::same_path(&task.input_path, &task.output_path) {
        return Err(TranscodeError::io(format!(
            "Refusing to overwrite source {}",
            task.input_path.display()
        )));
    }

    let image = codec.decode(&task.input_path)?;
    debug!(
        "Loaded '{}': {}×{} {:?}",
        display_name(&task.input_path),
        image.width(),
        image.height(),
        image.color_mode()
    );

    let bytes = render(codec, image, task.format, &task.settings)?;
    let written = fs::write_bytes(&task.output_path, &bytes)?;

    debug!(
        "'{}' → '{}' ({} bytes)",
        display_name(&task.input_path),
        display_name(&task.output_path),
        written
    );
    Ok(written)
}

/// Applies the policy's color normalization and the resize, then encodes.
pub fn render(
    codec: &dyn Codec,
    image: ImageHandle,
    format: ImageFormat,
    settings: &ExportSettings,
) -> TranscodeResult<Vec<u8>> {
    let policy = EncodePolicy::resolve(format, settings);
    let image = policy.normalize(image);

    let (width, height) = compute_resize(
        image.width(),
        image.height(),
        settings.resize_percent,
        settings.max_width,
        settings.max_height,
    );
    let image = resample(image, width, height);

    codec.encode(&image, &policy.params)
}
