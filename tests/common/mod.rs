#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use image_transcoder_lib::processing::EncoderParams;
use image_transcoder_lib::{
    CancelToken, Codec, ImageCodec, ImageHandle, TranscodeError, TranscodeResult,
};

pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90, 200])
    });
    image.save(path).unwrap();
}

pub fn write_rgb_png(path: &Path, width: u32, height: u32) {
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 40]));
    image.save(path).unwrap();
}

/// Real codec that counts decode calls.
#[derive(Default)]
pub struct CountingCodec {
    pub decodes: AtomicUsize,
}

impl CountingCodec {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl Codec for CountingCodec {
    fn decode(&self, path: &Path) -> TranscodeResult<ImageHandle> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        ImageCodec.decode(path)
    }

    fn encode(&self, image: &ImageHandle, params: &EncoderParams) -> TranscodeResult<Vec<u8>> {
        ImageCodec.encode(image, params)
    }
}

/// Real codec whose WebP encoder always rejects its input.
pub struct BrokenWebpCodec;

impl Codec for BrokenWebpCodec {
    fn decode(&self, path: &Path) -> TranscodeResult<ImageHandle> {
        ImageCodec.decode(path)
    }

    fn encode(&self, image: &ImageHandle, params: &EncoderParams) -> TranscodeResult<Vec<u8>> {
        match params {
            EncoderParams::WebP { .. } => Err(TranscodeError::encode("webp encoder rejected the image")),
            _ => ImageCodec.encode(image, params),
        }
    }
}

/// Real codec that requests a stop while decoding the first image.
pub struct CancellingCodec {
    pub cancel: CancelToken,
}

impl Codec for CancellingCodec {
    fn decode(&self, path: &Path) -> TranscodeResult<ImageHandle> {
        self.cancel.cancel();
        ImageCodec.decode(path)
    }

    fn encode(&self, image: &ImageHandle, params: &EncoderParams) -> TranscodeResult<Vec<u8>> {
        ImageCodec.encode(image, params)
    }
}
