use std::path::{Path, PathBuf};
use crate::core::{ExportSettings, JobConfig};
use crate::utils::{TranscodeError, TranscodeResult, ValidationError};

/// Validates export settings before a batch starts
pub fn validate_settings(settings: &ExportSettings) -> TranscodeResult<()> {
    if settings.formats.is_empty() {
        return Err(TranscodeError::no_input("No target format requested"));
    }

    if !(1..=100).contains(&settings.resize_percent) {
        return Err(ValidationError::settings(format!(
            "Invalid resize percentage: {}. Must be between 1 and 100",
            settings.resize_percent
        ))
        .into());
    }

    validate_quality("JPEG", settings.jpeg_quality)?;
    validate_quality("WebP", settings.webp_quality)?;
    Ok(())
}

fn validate_quality(label: &str, quality: u8) -> TranscodeResult<()> {
    if quality == 0 || quality > 100 {
        return Err(ValidationError::settings(format!(
            "Invalid {label} quality value: {quality}. Must be between 1 and 100"
        ))
        .into());
    }
    Ok(())
}

/// Validates a multi-destination request
pub fn validate_export(sources: &[PathBuf], settings: &ExportSettings) -> TranscodeResult<()> {
    if sources.is_empty() {
        return Err(TranscodeError::no_input("No source images given"));
    }
    validate_settings(settings)
}

/// Validates an in-place request.
///
/// A missing or non-directory root folder is the one fatal condition of an
/// in-place batch.
pub fn validate_job_config(config: &JobConfig) -> TranscodeResult<()> {
    validate_source_folder(&config.folder)?;

    let ext = config.source_extension.trim_start_matches('.');
    if ext.is_empty() {
        return Err(ValidationError::settings("Source extension cannot be empty").into());
    }

    if !config.keep_backup && ext.eq_ignore_ascii_case(config.target.canonical_extension()) {
        return Err(ValidationError::settings(format!(
            "Converting .{ext} to {} in place without a backup would overwrite the originals",
            config.target
        ))
        .into());
    }

    validate_settings(&config.export_settings())
}

fn validate_source_folder(folder: &Path) -> TranscodeResult<()> {
    if !folder.is_dir() {
        return Err(TranscodeError::SourceDirectory(folder.to_path_buf()));
    }
    Ok(())
}
