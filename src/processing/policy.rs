//! Maps export settings to per-format encoder parameters and alpha handling.
//!
//! | Format | Alpha                              | Parameters                       |
//! |--------|------------------------------------|----------------------------------|
//! | PNG    | kept unless `drop_alpha`           | optimize flag                    |
//! | JPEG   | always dropped                     | quality 1-100                    |
//! | WEBP   | kept unless `drop_alpha`           | lossless, or lossy quality 1-100 |
//!
//! WebP always uses the slowest, highest-effort compression method.

use image::{ColorType, DynamicImage};
use serde::Serialize;

use crate::core::ExportSettings;
use crate::utils::{ImageFormat, TranscodeResult};
use super::codec::{ColorMode, ImageHandle};

/// libwebp compression method (0 = fast, 6 = smallest output).
pub const WEBP_METHOD: u8 = 6;

/// Pixel layout a format is encoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorTarget {
    /// Opaque RGB; any alpha is discarded
    Opaque,
    /// Keep transparency when the source has it
    PreserveAlpha,
}

/// WebP compression mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WebpMode {
    Lossless,
    Lossy { quality: u8 },
}

/// Format-specific encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncoderParams {
    Png { optimize: bool },
    Jpeg { quality: u8 },
    WebP { mode: WebpMode, method: u8 },
}

impl EncoderParams {
    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Png { .. } => ImageFormat::PNG,
            Self::Jpeg { .. } => ImageFormat::JPEG,
            Self::WebP { .. } => ImageFormat::WebP,
        }
    }
}

/// Resolved encoding plan for one target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodePolicy {
    pub color: ColorTarget,
    pub params: EncoderParams,
}

impl EncodePolicy {
    /// Resolves the policy for `format` under `settings`.
    pub fn resolve(format: ImageFormat, settings: &ExportSettings) -> Self {
        let keep_alpha = if settings.drop_alpha || !format.supports_alpha() {
            ColorTarget::Opaque
        } else {
            ColorTarget::PreserveAlpha
        };

        match format {
            ImageFormat::PNG => Self {
                color: keep_alpha,
                params: EncoderParams::Png { optimize: settings.png_optimize },
            },
            ImageFormat::JPEG => Self {
                color: ColorTarget::Opaque,
                params: EncoderParams::Jpeg { quality: settings.jpeg_quality.clamp(1, 100) },
            },
            ImageFormat::WebP => {
                let mode = if settings.webp_lossless {
                    WebpMode::Lossless
                } else {
                    WebpMode::Lossy { quality: settings.webp_quality.clamp(1, 100) }
                };
                Self {
                    color: keep_alpha,
                    params: EncoderParams::WebP { mode, method: WEBP_METHOD },
                }
            }
        }
    }

    /// Resolves a policy from a format name or extension.
    ///
    /// Fails with `UnsupportedFormat` for anything but PNG, JPEG and WEBP.
    pub fn for_format_name(name: &str, settings: &ExportSettings) -> TranscodeResult<Self> {
        Ok(Self::resolve(name.parse()?, settings))
    }

    pub fn format(&self) -> ImageFormat {
        self.params.format()
    }

    /// Color mode the encoder receives for a source in `source` mode.
    pub fn target_mode(&self, source: ColorMode) -> ColorMode {
        match (self.color, self.format()) {
            (ColorTarget::Opaque, _) => ColorMode::Rgb,
            (ColorTarget::PreserveAlpha, ImageFormat::JPEG) => ColorMode::Rgb,
            (ColorTarget::PreserveAlpha, ImageFormat::WebP) => {
                if source.has_alpha() || source == ColorMode::Other {
                    ColorMode::Rgba
                } else {
                    ColorMode::Rgb
                }
            }
            (ColorTarget::PreserveAlpha, ImageFormat::PNG) => match source {
                ColorMode::Indexed => ColorMode::Rgba,
                other => other,
            },
        }
    }

    /// Converts `image` to the pixel layout this policy's encoder accepts.
    pub fn normalize(&self, image: ImageHandle) -> ImageHandle {
        let dynamic = image.into_dynamic();
        let has_alpha = dynamic.color().has_alpha();

        let normalized = match (self.color, self.format()) {
            (ColorTarget::Opaque, _) | (_, ImageFormat::JPEG) => into_rgb8(dynamic),
            // libwebp takes 8-bit RGB or RGBA only
            (ColorTarget::PreserveAlpha, ImageFormat::WebP) => {
                if has_alpha {
                    into_rgba8(dynamic)
                } else {
                    into_rgb8(dynamic)
                }
            }
            (ColorTarget::PreserveAlpha, ImageFormat::PNG) => match dynamic.color() {
                ColorType::L8
                | ColorType::La8
                | ColorType::Rgb8
                | ColorType::Rgba8
                | ColorType::L16
                | ColorType::La16
                | ColorType::Rgb16
                | ColorType::Rgba16 => dynamic,
                _ if has_alpha => into_rgba8(dynamic),
                _ => into_rgb8(dynamic),
            },
        };

        ImageHandle::new(normalized)
    }
}

fn into_rgb8(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn into_rgba8(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgba8(_) => image,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    }
}
