//! Decoded image handle and the codec seam.
//!
//! Everything that touches encoded bytes goes through [`Codec`], so the batch
//! runner can be driven with an instrumented codec in tests.

use std::path::Path;
use image::{ColorType, DynamicImage, ImageReader};
use serde::Serialize;

use crate::utils::{TranscodeError, TranscodeResult};
use super::encode::encode_image;
use super::policy::EncoderParams;

/// Color layout of a decoded image.
///
/// Palette images are expanded while decoding, so the default codec never
/// reports `Indexed`; it exists for codecs that keep palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    Gray,
    Rgb,
    Rgba,
    Indexed,
    Other,
}

impl ColorMode {
    fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => Self::Gray,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Self::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Self::Rgba,
            _ => Self::Other,
        }
    }

    /// Whether this mode carries an alpha channel
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// A decoded raster owned by exactly one job.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    image: DynamicImage,
}

impl ImageHandle {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::from_color_type(self.image.color())
    }

    /// True for any layout with an alpha channel, gray+alpha included.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Raw pixel bytes in the image's native layout
    pub fn pixels(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }
}

impl From<DynamicImage> for ImageHandle {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// Decode/encode capability used by every job.
pub trait Codec: Send + Sync {
    /// Reads and decodes the file at `path`.
    fn decode(&self, path: &Path) -> TranscodeResult<ImageHandle>;

    /// Encodes `image` into a complete file in memory.
    fn encode(&self, image: &ImageHandle, params: &EncoderParams) -> TranscodeResult<Vec<u8>>;
}

/// Codec backed by the `image` crate, with libwebp for WebP output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> TranscodeResult<ImageHandle> {
        let reader = ImageReader::open(path)
            .map_err(|e| TranscodeError::decode(format!("{}: {e}", path.display())))?
            .with_guessed_format()
            .map_err(|e| TranscodeError::decode(format!("{}: {e}", path.display())))?;

        let image = reader
            .decode()
            .map_err(|e| TranscodeError::decode(format!("{}: {e}", path.display())))?;

        Ok(ImageHandle::new(image))
    }

    fn encode(&self, image: &ImageHandle, params: &EncoderParams) -> TranscodeResult<Vec<u8>> {
        encode_image(image, params)
    }
}
