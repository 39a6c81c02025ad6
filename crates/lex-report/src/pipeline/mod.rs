//! Pipeline module.
//!
//! This module provides the report pipeline, its progress reporting and the
//! synthetic sample dataset used when no input file is given.

mod builder;
pub mod progress;
pub mod sample;

pub use builder::{ReportPipeline, ReportPipelineBuilder, RunOutcome, RunSummary, abort_message};
pub use progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportStage};
pub use sample::{SAMPLE_FILENAME, generate_sample_frame, write_sample_csv};
