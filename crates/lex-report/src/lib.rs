//! Data Analysis Report Library
//!
//! A batch report generator built with Rust, Polars, Plotters and printpdf.
//!
//! # Overview
//!
//! One run turns a CSV or JSON file into a PDF document:
//!
//! - **Loading**: CSV with quoting fallbacks, JSON arrays of records
//! - **Analysis**: Descriptive statistics, missing-value counts, Pearson correlations
//! - **Charts**: Histogram, correlation heatmap and top-category bar chart as PNG
//! - **Document**: Title, executive summary, data quality, statistics table,
//!   charts, insights and recommendations
//! - **Sample Data**: A seeded synthetic sales dataset when no input is given
//! - **Progress Reporting**: Stage-by-stage updates through a callback
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_report::{ReportConfig, ReportPipeline, RunOutcome};
//! use std::path::Path;
//!
//! let config = ReportConfig::builder()
//!     .output_dir("reports")
//!     .histogram_bins(30)
//!     .build()?;
//!
//! let outcome = ReportPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(Some(Path::new("sales.csv")))?;
//!
//! match outcome {
//!     RunOutcome::Completed(summary) => println!("{}", summary.report_path.display()),
//!     RunOutcome::Aborted(reason) => println!("Stopped: {}", reason),
//! }
//! ```
//!
//! # Components
//!
//! Each stage can also be used on its own:
//!
//! ```rust,ignore
//! use lex_report::{ChartRenderer, DataAnalyzer, ReportGenerator, load_table};
//!
//! let table = load_table(Path::new("sales.json"))?;
//! let analysis = DataAnalyzer::analyze(&table)?.expect("rows");
//! let charts = ChartRenderer::new(&config).render(&table, &analysis)?;
//! let pdf = ReportGenerator::new(&config).generate(&table, &analysis, &charts)?;
//! ```

pub mod analyzer;
pub mod charts;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analyzer::DataAnalyzer;
pub use charts::ChartRenderer;
pub use config::{ConfigValidationError, ReportConfig, ReportConfigBuilder};
pub use error::{ReportError, Result, ResultExt};
pub use loader::{SourceFormat, load_table};
pub use pipeline::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportPipeline,
    ReportPipelineBuilder, ReportStage, RunOutcome, RunSummary,
};
pub use reporting::{ReportGenerator, ReportSummary};
pub use types::{
    AnalysisResult, ChartArtifact, ChartKind, ColumnKind, ColumnOverview, CorrelationMatrix,
    NumericSummary, Table,
};
