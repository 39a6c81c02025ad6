//! Custom error types for the report pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. The load,
//! format and empty-table kinds are "recoverable": the orchestrator turns them
//! into an aborted run with a message instead of a process failure.
//!
//! Errors are serializable so they can be embedded in the JSON summary.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::Path;
use thiserror::Error;

/// The main error type for the report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input file extension is not one the loader understands.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The input file could not be read or parsed.
    #[error("Error loading file '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// The loaded table has no rows (or no columns).
    #[error("No data to analyze: the input contains no rows")]
    NoData,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A chart could not be drawn or written.
    #[error("Failed to render chart '{chart}': {reason}")]
    ChartRenderingFailed { chart: String, reason: String },

    /// The PDF document could not be laid out or saved.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    /// Build a load failure for `path`.
    pub fn load_failed(path: &Path, reason: impl ToString) -> Self {
        ReportError::LoadFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReportError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code, used in the JSON summary and log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::NoData => "NO_DATA",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ChartRenderingFailed { .. } => "CHART_RENDERING_FAILED",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is one of the recognised input failures.
    ///
    /// Recoverable errors end the run early with a printed message; every
    /// other error is a genuine failure of the process.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) | Self::LoadFailed { .. } | Self::NoData => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ReportError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReportError::Polars(e).with_context(context))
    }
}
