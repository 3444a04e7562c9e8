use std::path::PathBuf;
use crate::core::ExportSettings;
use crate::processing::{Codec, ImageCodec, estimate_all};
use crate::utils::{ImageFormat, TranscodeError, TranscodeResult, validate_settings};

/// Decodes `path` once and estimates its encoded size for every format in
/// `settings`.
pub async fn estimate_sizes(
    path: PathBuf,
    settings: ExportSettings,
) -> TranscodeResult<Vec<(ImageFormat, usize)>> {
    let settings = settings.normalized();
    validate_settings(&settings)?;

    tokio::task::spawn_blocking(move || {
        let codec = ImageCodec;
        let image = codec.decode(&path)?;
        estimate_all(&codec, &image, &settings)
    })
    .await
    .map_err(|e| TranscodeError::processing(format!("Task panicked: {e}")))?
}
