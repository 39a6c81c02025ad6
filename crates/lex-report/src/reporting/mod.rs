//! Report generation module.
//!
//! This module lays out the analysis as a paginated A4 PDF document:
//! title and metadata, executive summary, data quality, a statistics grid,
//! the chart images and closing recommendations.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_report::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new(&config);
//! let pdf = generator.generate(&table, &analysis, &charts)?;
//!
//! // Optional JSON sidecar
//! generator.write_summary_json(&analysis, &charts)?;
//! ```

mod document;
mod generator;

pub use generator::{
    ReportGenerator, ReportSummary, data_quality_text, executive_summary, statistics_rows,
};
