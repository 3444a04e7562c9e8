pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{TranscodeError, TranscodeResult, ValidationError};
pub use validation::{validate_export, validate_job_config, validate_settings};
pub use formats::{ImageFormat, output_path_for};
pub use fs::{backup_dir_for, display_name, human_size};
