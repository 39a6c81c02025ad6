//! Progress reporting for the report pipeline.
//!
//! The pipeline emits one [`ProgressUpdate`] per step to an optional
//! [`ProgressReporter`]. The command line front end prints the messages;
//! library users can forward them anywhere.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_report::ReportPipeline;
//!
//! let outcome = ReportPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run(Some(Path::new("sales.csv")))?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the report pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStage {
    /// Preparing the output directory, generating sample data if needed
    Initializing,
    /// Reading the input file
    Loading,
    /// Computing statistics and correlations
    Analyzing,
    /// Rendering chart images
    Visualizing,
    /// Laying out and saving the PDF document
    Rendering,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline stopped early on unusable input
    Aborted,
    /// Pipeline failed with an error
    Failed,
}

impl ReportStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Loading => "Loading Data",
            Self::Analyzing => "Analyzing Data",
            Self::Visualizing => "Creating Visualizations",
            Self::Rendering => "Generating Report",
            Self::Complete => "Complete",
            Self::Aborted => "Aborted",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    ///
    /// Weights of the working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.05,
            Self::Loading => 0.15,
            Self::Analyzing => 0.20,
            Self::Visualizing => 0.30,
            Self::Rendering => 0.30,
            Self::Complete | Self::Aborted | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::Loading => 0.05,
            Self::Analyzing => 0.20,
            Self::Visualizing => 0.40,
            Self::Rendering => 0.70,
            Self::Complete => 1.0,
            Self::Aborted | Self::Failed => 0.0,
        }
    }
}

/// A progress update with a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: ReportStage,

    /// Optional detail, e.g. the input format while loading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without sub-stage info.
    pub fn new(stage: ReportStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a new progress update with sub-stage information.
    pub fn with_sub_stage(
        stage: ReportStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sub_stage: Some(sub_stage.into()),
            ..Self::new(stage, stage_progress, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(ReportStage::Complete, 1.0, message)
    }

    /// Creates an update for a run that stopped on unusable input.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(ReportStage::Aborted, 0.0, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ReportStage::Failed, 0.0, message)
    }
}

/// Trait for receiving progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` so a configured pipeline can be
/// handed to another thread.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{:>3.0}% {}", update.progress * 100.0, update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called once per pipeline step.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(ReportStage::Analyzing, 0.5, "Analyzing data...");
        assert_eq!(update.stage, ReportStage::Analyzing);
        assert!(update.sub_stage.is_none());
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.30).abs() < 1e-6);
        assert_eq!(update.message, "Analyzing data...");
    }

    #[test]
    fn test_progress_update_with_sub_stage() {
        let update = ProgressUpdate::with_sub_stage(ReportStage::Loading, "CSV", 1.0, "Loaded");
        assert_eq!(update.sub_stage, Some("CSV".to_string()));
        assert!((update.progress - 0.20).abs() < 1e-6);
    }

    #[test]
    fn test_progress_update_terminal_states() {
        let done = ProgressUpdate::complete("Done!");
        assert_eq!(done.stage, ReportStage::Complete);
        assert_eq!(done.progress, 1.0);

        let aborted = ProgressUpdate::aborted("Unsupported file format.");
        assert_eq!(aborted.stage, ReportStage::Aborted);
        assert_eq!(aborted.progress, 0.0);

        let failed = ProgressUpdate::failed("boom");
        assert_eq!(failed.stage, ReportStage::Failed);
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(ReportStage::Loading, 0.5, "Test"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_report_stage_display_name() {
        assert_eq!(ReportStage::Visualizing.display_name(), "Creating Visualizations");
        assert_eq!(ReportStage::Complete.display_name(), "Complete");
    }

    #[test]
    fn test_report_stage_weights_sum() {
        let stages = [
            ReportStage::Initializing,
            ReportStage::Loading,
            ReportStage::Analyzing,
            ReportStage::Visualizing,
            ReportStage::Rendering,
        ];

        let total_weight: f32 = stages.iter().map(|s| s.weight()).sum();
        assert!((total_weight - 1.0).abs() < 0.01, "Weights should sum to ~1.0");

        for pair in stages.windows(2) {
            let expected = pair[0].base_progress() + pair[0].weight();
            assert!((pair[1].base_progress() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_report_stage_json_values() {
        let stage_expectations = [
            (ReportStage::Initializing, "\"initializing\""),
            (ReportStage::Loading, "\"loading\""),
            (ReportStage::Analyzing, "\"analyzing\""),
            (ReportStage::Visualizing, "\"visualizing\""),
            (ReportStage::Rendering, "\"rendering\""),
            (ReportStage::Complete, "\"complete\""),
            (ReportStage::Aborted, "\"aborted\""),
            (ReportStage::Failed, "\"failed\""),
        ];

        for (stage, expected_json) in stage_expectations {
            let json = serde_json::to_string(&stage).expect("Should serialize");
            assert_eq!(
                json, expected_json,
                "ReportStage::{:?} should serialize to {}",
                stage, expected_json
            );
        }
    }

    #[test]
    fn test_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::new(
                ReportStage::Rendering,
                0.5,
                "Test from background thread",
            ));
        });

        handle.join().expect("Thread should not panic");
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
