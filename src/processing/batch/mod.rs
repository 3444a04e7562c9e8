mod control;
mod runner;

pub use control::{CancelToken, EventSink};
pub use runner::BatchRunner;
