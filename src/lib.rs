pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod metadata;
pub mod processing;
pub mod profile;
pub mod report;
pub mod utils;

pub use batch::{collect_image_files, is_image_file, prepare_output_dir, run_batch, BatchOptions};
pub use error::{CompressionError, FailureKind, Result, TransformError};
pub use formats::{OutputFormat, TargetFormat};
pub use processing::{
    decode_image, encode_image, generate_output_path, process_image_pipeline, resize_image,
    scale_dimensions, transform, ImageOutcome, ImageResult, ImageTask,
};
pub use profile::{resolve, CompressionPlan, CompressionProfile, Overrides};
pub use report::{finalize, CompressionReport, ReportAggregator};
