//! Encoded-size preview without touching the filesystem.

use crate::core::ExportSettings;
use crate::utils::{ImageFormat, TranscodeResult};
use super::codec::{Codec, ImageHandle};
use super::job::render;

/// Size in bytes `image` would have when exported as `format`.
pub fn estimate_encoded_size(
    codec: &dyn Codec,
    image: &ImageHandle,
    format: ImageFormat,
    settings: &ExportSettings,
) -> TranscodeResult<usize> {
    render(codec, image.clone(), format, settings).map(|bytes| bytes.len())
}

/// Estimates every format in `settings.formats`, in order.
pub fn estimate_all(
    codec: &dyn Codec,
    image: &ImageHandle,
    settings: &ExportSettings,
) -> TranscodeResult<Vec<(ImageFormat, usize)>> {
    settings
        .formats
        .iter()
        .map(|&format| Ok((format, estimate_encoded_size(codec, image, format, settings)?)))
        .collect()
}
