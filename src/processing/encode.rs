//! Format encoders producing complete files in memory.

use std::io::Cursor;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;

use crate::utils::{TranscodeError, TranscodeResult};
use super::codec::ImageHandle;
use super::policy::{EncoderParams, WebpMode};

type Result<T> = TranscodeResult<T>;

/// Encodes `image` with `params`. The image must already be normalized by
/// the matching `EncodePolicy`.
pub fn encode_image(image: &ImageHandle, params: &EncoderParams) -> Result<Vec<u8>> {
    match *params {
        EncoderParams::Png { optimize } => encode_png(image.as_dynamic(), optimize),
        EncoderParams::Jpeg { quality } => encode_jpeg(image.as_dynamic(), quality),
        EncoderParams::WebP { mode, method } => encode_webp(image.as_dynamic(), mode, method),
    }
}

/// PNG; `optimize` trades encode time for the best zlib compression.
fn encode_png(image: &DynamicImage, optimize: bool) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = if optimize {
        PngEncoder::new_with_quality(Cursor::new(&mut buffer), CompressionType::Best, FilterType::Adaptive)
    } else {
        PngEncoder::new(Cursor::new(&mut buffer))
    };

    image
        .write_with_encoder(encoder)
        .map_err(|e| TranscodeError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buffer)
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);

    image
        .write_with_encoder(encoder)
        .map_err(|e| TranscodeError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buffer)
}

fn encode_webp(image: &DynamicImage, mode: WebpMode, method: u8) -> Result<Vec<u8>> {
    let (width, height) = (image.width(), image.height());
    let encoder = match image {
        DynamicImage::ImageRgba8(rgba) => webp::Encoder::from_rgba(rgba.as_raw(), width, height),
        DynamicImage::ImageRgb8(rgb) => webp::Encoder::from_rgb(rgb.as_raw(), width, height),
        other => {
            return Err(TranscodeError::encode(format!(
                "WebP encode failed: unsupported pixel layout {:?}",
                other.color()
            )));
        }
    };

    let mut config = webp::WebPConfig::new()
        .map_err(|_| TranscodeError::encode("WebP encode failed: cannot create encoder config"))?;
    config.method = i32::from(method);
    match mode {
        WebpMode::Lossless => config.lossless = 1,
        WebpMode::Lossy { quality } => {
            config.lossless = 0;
            config.quality = f32::from(quality);
        }
    }

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| TranscodeError::encode(format!("WebP encode failed: {e:?}")))?;
    Ok(memory.to_vec())
}
