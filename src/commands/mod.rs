//! Public entry points for shells (CLI, GUI) in front of the pipeline.
//!
//! - [`start_batch`]: start a batch and observe it through a [`BatchHandle`]
//! - [`convert_folder`] / [`export_images`]: start and wait
//! - [`estimate_sizes`]: encoded-size preview for one image

mod batch;
mod estimate;

pub use batch::*;
pub use estimate::estimate_sizes;
