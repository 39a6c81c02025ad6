//! Main report pipeline module.
//!
//! This module provides the `ReportPipeline` struct and builder for
//! sequencing the loader, analyzer, chart renderer and report generator.

use crate::analyzer::DataAnalyzer;
use crate::charts::ChartRenderer;
use crate::config::ReportConfig;
use crate::error::{ReportError, Result, ResultExt};
use crate::loader::{self, SourceFormat};
use crate::pipeline::progress::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportStage,
};
use crate::pipeline::sample::write_sample_csv;
use crate::reporting::ReportGenerator;
use crate::types::ChartArtifact;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Paths and counts of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The generated PDF document
    pub report_path: PathBuf,
    /// The JSON summary, when enabled
    pub summary_path: Option<PathBuf>,
    /// Charts in the order they were placed in the document
    pub charts: Vec<ChartArtifact>,
    /// (rows, columns) of the analyzed table
    pub shape: (usize, usize),
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The document was written.
    Completed(RunSummary),
    /// The input could not be used; nothing was written after the check that failed.
    Aborted(ReportError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// The report pipeline.
///
/// Use [`ReportPipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::{ReportConfig, ReportPipeline, RunOutcome};
///
/// let outcome = ReportPipeline::builder()
///     .config(ReportConfig::builder().output_dir("out").build()?)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .run(Some(Path::new("sales.csv")))?;
///
/// if let RunOutcome::Completed(summary) = outcome {
///     println!("Wrote {}", summary.report_path.display());
/// }
/// ```
pub struct ReportPipeline {
    config: ReportConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    renderer: ChartRenderer,
    generator: ReportGenerator,
}

// Ensure ReportPipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(ReportPipeline: Send);

impl ReportPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> ReportPipelineBuilder {
        ReportPipelineBuilder::default()
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run the pipeline once.
    ///
    /// Without an input path a synthetic sample dataset is generated and
    /// analyzed instead.
    ///
    /// # Errors
    ///
    /// Unusable input (unsupported extension, unreadable file, no rows) is
    /// not an error: it yields `Ok(RunOutcome::Aborted)`. `Err` is returned
    /// for I/O, chart and document failures.
    pub fn run(&self, input: Option<&Path>) -> Result<RunOutcome> {
        match self.run_internal(input) {
            Ok(outcome) => {
                if outcome.is_completed() {
                    self.report_progress(ProgressUpdate::complete(format!(
                        "Analysis complete! Check the '{}' directory.",
                        self.config.output_dir.display()
                    )));
                }
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    /// Turn a recognised input failure into an aborted run.
    fn abort(&self, err: ReportError) -> RunOutcome {
        warn!("Stopping early: {}", err);
        self.report_progress(ProgressUpdate::aborted(abort_message(&err)));
        RunOutcome::Aborted(err)
    }

    fn run_internal(&self, input: Option<&Path>) -> Result<RunOutcome> {
        let start_time = Instant::now();
        let output_dir = &self.config.output_dir;

        self.report_progress(ProgressUpdate::new(
            ReportStage::Initializing,
            0.0,
            "Starting report pipeline...",
        ));
        fs::create_dir_all(output_dir)
            .map_err(ReportError::from)
            .context(format!("Failed to create {}", output_dir.display()))?;

        let input: PathBuf = match input {
            Some(path) => path.to_path_buf(),
            None => {
                self.report_progress(ProgressUpdate::new(
                    ReportStage::Initializing,
                    0.5,
                    "No data file provided. Generating sample data...",
                ));
                write_sample_csv(&self.config)?
            }
        };

        // Step 1: Load
        info!("Step 1: Loading {}", input.display());
        let table = match loader::load_table(&input) {
            Ok(table) => table,
            Err(e) if e.is_recoverable() => return Ok(self.abort(e)),
            Err(e) => return Err(e),
        };
        if table.is_empty() {
            return Ok(self.abort(ReportError::NoData));
        }
        if let Some(format) = SourceFormat::from_path(&input) {
            self.report_progress(ProgressUpdate::with_sub_stage(
                ReportStage::Loading,
                format.as_str(),
                1.0,
                format!(
                    "Successfully loaded {} data: {} rows, {} columns",
                    format,
                    table.height(),
                    table.width()
                ),
            ));
        }

        // Step 2: Analyze
        self.report_progress(ProgressUpdate::new(
            ReportStage::Analyzing,
            0.0,
            "Analyzing data...",
        ));
        info!("Step 2: Analyzing data...");
        let Some(analysis) = DataAnalyzer::analyze(&table)? else {
            return Ok(self.abort(ReportError::NoData));
        };

        // Step 3: Charts
        self.report_progress(ProgressUpdate::new(
            ReportStage::Visualizing,
            0.0,
            "Creating visualizations...",
        ));
        info!("Step 3: Creating visualizations...");
        let charts = self.renderer.render(&table, &analysis)?;

        // Step 4: Document
        self.report_progress(ProgressUpdate::new(
            ReportStage::Rendering,
            0.0,
            "Generating PDF report...",
        ));
        info!("Step 4: Generating PDF report...");
        let report_path = self.generator.generate(&table, &analysis, &charts)?;
        self.report_progress(ProgressUpdate::new(
            ReportStage::Rendering,
            1.0,
            format!("Report generated successfully: {}", report_path.display()),
        ));

        let summary_path = if self.config.emit_json_summary {
            Some(self.generator.write_summary_json(&analysis, &charts)?)
        } else {
            None
        };

        info!(
            "Pipeline finished in {:.2}s: {} chart(s)",
            start_time.elapsed().as_secs_f64(),
            charts.len()
        );

        Ok(RunOutcome::Completed(RunSummary {
            report_path,
            summary_path,
            charts,
            shape: analysis.shape,
        }))
    }
}

/// User-facing line printed when a run stops on unusable input.
pub fn abort_message(err: &ReportError) -> String {
    match err {
        ReportError::UnsupportedFormat(_) => "Unsupported file format.".to_string(),
        ReportError::LoadFailed { .. } => "Failed to load data.".to_string(),
        ReportError::NoData => "No data to analyze. The dataset contains no rows.".to_string(),
        ReportError::WithContext { source, .. } => abort_message(source),
        other => other.to_string(),
    }
}

/// Builder for [`ReportPipeline`].
#[derive(Default)]
pub struct ReportPipelineBuilder {
    config: Option<ReportConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure ReportPipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(ReportPipelineBuilder: Send);

impl ReportPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during the run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(
        self,
    ) -> std::result::Result<ReportPipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let renderer = ChartRenderer::new(&config);
        let generator = ReportGenerator::new(&config);

        Ok(ReportPipeline {
            config,
            progress_reporter: self.progress_reporter,
            renderer,
            generator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pipeline_in(dir: &Path) -> (ReportPipeline, Arc<Mutex<Vec<ProgressUpdate>>>) {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = updates.clone();
        let config = ReportConfig::builder().output_dir(dir).build().unwrap();
        let pipeline = ReportPipeline::builder()
            .config(config)
            .on_progress(move |update| sink.lock().unwrap().push(update))
            .build()
            .unwrap();
        (pipeline, updates)
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = ReportPipeline::builder().build().unwrap();
        assert!(pipeline.progress_reporter.is_none());
        assert_eq!(pipeline.config().histogram_bins, 20);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let mut config = ReportConfig::default();
        config.top_categories = 0;

        assert!(ReportPipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_pipeline_builder_with_progress_callback() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let pipeline = ReportPipeline::builder()
            .on_progress(move |_update| {
                call_count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        pipeline.report_progress(ProgressUpdate::new(ReportStage::Analyzing, 0.5, "Test"));

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsupported_format_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "a,b\n1,2\n").unwrap();
        let (pipeline, updates) = pipeline_in(dir.path());

        let outcome = pipeline.run(Some(&input)).unwrap();

        assert!(matches!(outcome, RunOutcome::Aborted(ReportError::UnsupportedFormat(_))));
        let last = updates.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.stage, ReportStage::Aborted);
        assert_eq!(last.message, "Unsupported file format.");
        assert!(!dir.path().join("analysis_report.pdf").exists());
    }

    #[test]
    fn test_missing_file_aborts_with_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, updates) = pipeline_in(dir.path());

        let outcome = pipeline
            .run(Some(&dir.path().join("missing.csv")))
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Aborted(ReportError::LoadFailed { .. })));
        let messages: Vec<String> = updates
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.message.clone())
            .collect();
        assert!(messages.contains(&"Failed to load data.".to_string()));
        assert!(!messages.contains(&"Analyzing data...".to_string()));
    }

    #[test]
    fn test_abort_messages() {
        assert_eq!(
            abort_message(&ReportError::UnsupportedFormat("x.txt".into())),
            "Unsupported file format."
        );
        assert_eq!(
            abort_message(&ReportError::load_failed(Path::new("x.csv"), "bad")),
            "Failed to load data."
        );
        assert!(abort_message(&ReportError::NoData).starts_with("No data"));
        assert_eq!(
            abort_message(&ReportError::NoData.with_context("loading")),
            abort_message(&ReportError::NoData)
        );
    }
}
