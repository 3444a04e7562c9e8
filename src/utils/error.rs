//! Error types for the transcoder.
//!
//! Provides a hierarchy of error types using `thiserror`. Per-item errors
//! (`Decode`, `Encode`, `Io`) are captured by the batch runner and turned into
//! failed outcomes; the remaining variants are configuration errors surfaced
//! before a batch starts.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for batch requests and settings.
#[derive(Error, Debug, Serialize, PartialEq)]
pub enum ValidationError {
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Main error type for the transcoder.
#[derive(Error, Debug, Serialize, PartialEq)]
pub enum TranscodeError {
    /// Source could not be read or decoded
    #[error("open error: {0}")]
    Decode(String),

    /// Codec rejected the parameters or pixel data
    #[error("encode error: {0}")]
    Encode(String),

    /// Move, delete or write failure
    #[error("IO error: {0}")]
    Io(String),

    /// Requested format is not one of PNG, JPEG, WEBP
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Batch requested with nothing to do
    #[error("No input: {0}")]
    NoInput(String),

    /// Request or settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The in-place root folder is missing or unusable; the batch never starts
    #[error("Folder not found: {0}")]
    SourceDirectory(PathBuf),

    /// Worker failure outside of any single item
    #[error("Processing error: {0}")]
    Processing(String),
}

/// Convenience result type for transcoder operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

impl TranscodeError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::Io(msg.into())
    }

    pub fn unsupported_format<T: Into<String>>(msg: T) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn no_input<T: Into<String>>(msg: T) -> Self {
        Self::NoInput(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    /// Whether this error rejects the whole request rather than a single item.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::NoInput(_)
                | Self::Validation(_)
                | Self::SourceDirectory(_)
        )
    }
}

impl ValidationError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

// Convert std::io::Error to TranscodeError
impl From<io::Error> for TranscodeError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<image::ImageError> for TranscodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::Io(e.to_string()),
            image::ImageError::Encoding(e) => Self::Encode(e.to_string()),
            image::ImageError::Parameter(e) => Self::Encode(e.to_string()),
            other => Self::Decode(other.to_string()),
        }
    }
}
