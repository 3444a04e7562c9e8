// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    BatchEvent, BatchReport, ExportSettings, ItemOutcome, JobConfig, Outcome, ProgressUpdate,
    TranscodeTask,
};
pub use processing::{
    BatchRunner, CancelToken, Codec, ColorMode, EncodePolicy, EventSink, ImageCodec, ImageHandle,
    compute_resize,
};
pub use utils::{ImageFormat, TranscodeError, TranscodeResult, human_size};
pub use commands::*;
