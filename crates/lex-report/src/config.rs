//! Configuration types for the report pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default output directory for charts, sample data and the document.
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Default document file name.
pub const DEFAULT_OUTPUT_FILENAME: &str = "analysis_report.pdf";

/// Default document title.
pub const DEFAULT_TITLE: &str = "Data Analysis Report";

/// Configuration for the report pipeline.
///
/// Use [`ReportConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::config::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .output_dir("out")
///     .histogram_bins(30)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving the chart images, the generated sample data and
    /// the document. Created on first use.
    /// Default: "reports"
    pub output_dir: PathBuf,

    /// File name of the generated PDF document.
    /// Default: "analysis_report.pdf"
    pub output_filename: String,

    /// Title printed at the top of the first page.
    /// Default: "Data Analysis Report"
    pub title: String,

    /// Number of buckets in the distribution histogram.
    /// Default: 20
    pub histogram_bins: usize,

    /// Maximum number of bars in the category chart.
    /// Default: 10
    pub top_categories: usize,

    /// Column drawn in the histogram.
    /// If None, the first numeric column in table order is used.
    /// Default: None
    pub histogram_column: Option<String>,

    /// Column drawn in the category bar chart.
    /// If None, the first categorical column in table order is used.
    /// Default: None
    pub category_column: Option<String>,

    /// Width of the chart images in pixels.
    /// Default: 1000
    pub chart_width: u32,

    /// Height of the histogram and bar chart images in pixels.
    /// Default: 600
    pub chart_height: u32,

    /// Seed for the synthetic sample dataset.
    /// Default: 42
    pub sample_seed: u64,

    /// Number of rows (days) in the synthetic sample dataset.
    /// Default: 365
    pub sample_rows: usize,

    /// Whether to write a JSON summary of the analysis next to the document.
    /// Default: false
    pub emit_json_summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            histogram_bins: 20,
            top_categories: 10,
            histogram_column: None,
            category_column: None,
            chart_width: 1000,
            chart_height: 600,
            sample_seed: 42,
            sample_rows: 365,
            emit_json_summary: false,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Full path of the PDF document.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }

    /// Heatmap images are taller than the other charts so the cells stay square-ish.
    pub fn heatmap_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_width * 4 / 5)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "histogram_bins".to_string(),
                value: self.histogram_bins,
            });
        }

        if self.top_categories == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "top_categories".to_string(),
                value: self.top_categories,
            });
        }

        if self.chart_width < 200 || self.chart_height < 150 {
            return Err(ConfigValidationError::ChartTooSmall {
                width: self.chart_width,
                height: self.chart_height,
            });
        }

        let filename = self.output_filename.trim();
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || !filename.to_ascii_lowercase().ends_with(".pdf")
        {
            return Err(ConfigValidationError::InvalidFilename(
                self.output_filename.clone(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Chart size {width}x{height} is too small (minimum 200x150)")]
    ChartTooSmall { width: u32, height: u32 },

    #[error("Invalid output file name '{0}' (expected a plain file name ending in .pdf)")]
    InvalidFilename(String),
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    output_dir: Option<PathBuf>,
    output_filename: Option<String>,
    title: Option<String>,
    histogram_bins: Option<usize>,
    top_categories: Option<usize>,
    histogram_column: Option<String>,
    category_column: Option<String>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
    sample_seed: Option<u64>,
    sample_rows: Option<usize>,
    emit_json_summary: Option<bool>,
}

impl ReportConfigBuilder {
    /// Set the output directory for charts, sample data and the document.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the document file name (must end in `.pdf`).
    pub fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the number of histogram buckets.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of bars in the category chart.
    pub fn top_categories(mut self, n: usize) -> Self {
        self.top_categories = Some(n);
        self
    }

    /// Draw this column in the histogram instead of the first numeric one.
    pub fn histogram_column(mut self, column: impl Into<String>) -> Self {
        self.histogram_column = Some(column.into());
        self
    }

    /// Draw this column in the bar chart instead of the first categorical one.
    pub fn category_column(mut self, column: impl Into<String>) -> Self {
        self.category_column = Some(column.into());
        self
    }

    /// Set the chart image size in pixels.
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Set the seed used for the synthetic sample dataset.
    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set the number of rows of the synthetic sample dataset.
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Enable or disable the JSON summary next to the document.
    pub fn emit_json_summary(mut self, emit: bool) -> Self {
        self.emit_json_summary = Some(emit);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_filename: self.output_filename.unwrap_or(defaults.output_filename),
            title: self.title.unwrap_or(defaults.title),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            histogram_column: self.histogram_column,
            category_column: self.category_column,
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
            sample_seed: self.sample_seed.unwrap_or(defaults.sample_seed),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            emit_json_summary: self.emit_json_summary.unwrap_or(defaults.emit_json_summary),
        };

        config.validate()?;
        Ok(config)
    }
}
