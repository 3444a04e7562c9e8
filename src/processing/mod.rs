//! Image transcoding pipeline.
//!
//! - [`codec`]: the decoded [`ImageHandle`] and the [`Codec`] seam
//! - [`resize`]: output dimension math and Lanczos resampling
//! - [`policy`]: per-format encoder parameters and alpha handling
//! - [`job`]: one decode → encode → write unit
//! - [`batch`]: the runner that orchestrates whole batches

pub mod batch;
pub mod codec;
pub mod estimate;
pub mod job;
pub mod policy;
pub mod resize;
mod encode;

pub use batch::{BatchRunner, CancelToken, EventSink};
pub use codec::{Codec, ColorMode, ImageCodec, ImageHandle};
pub use estimate::{estimate_all, estimate_encoded_size};
pub use encode::encode_image;
pub use policy::{ColorTarget, EncodePolicy, EncoderParams, WebpMode, WEBP_METHOD};
pub use resize::{compute_resize, resample};
