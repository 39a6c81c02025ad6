//! Dataset analysis.
//!
//! This module derives an [`AnalysisResult`] from a loaded [`Table`]:
//! - Per-numeric-column descriptive statistics
//! - Per-column null counts and inferred kinds
//! - Pearson correlation between numeric columns

mod correlation;
mod statistics;
mod type_inference;

use crate::error::Result;
use crate::types::{AnalysisResult, ColumnKind, ColumnOverview, Table};
use tracing::debug;

// Re-export for internal use
pub(crate) use correlation::correlation_matrix;
pub(crate) use statistics::summarize_numeric;
pub(crate) use type_inference::infer_column_kind;

/// Computes summary statistics and correlations over a table.
pub struct DataAnalyzer;

impl DataAnalyzer {
    /// Analyze a table.
    ///
    /// Returns `Ok(None)` when the table has no rows or no columns, so an
    /// empty dataset never reaches the chart or document stages.
    pub fn analyze(table: &Table) -> Result<Option<AnalysisResult>> {
        if table.is_empty() {
            debug!("Skipping analysis of empty table {:?}", table.shape());
            return Ok(None);
        }

        let columns = table.column_names();

        let mut column_overviews = Vec::with_capacity(columns.len());
        for (name, kind) in columns.iter().zip(table.kinds()) {
            let series = table.series(name)?;
            column_overviews.push(ColumnOverview {
                name: name.clone(),
                dtype: format!("{:?}", series.dtype()),
                kind: *kind,
                null_count: series.null_count(),
            });
        }

        let numeric = table.columns_of_kind(ColumnKind::Numeric);

        let mut summary_stats = Vec::with_capacity(numeric.len());
        for name in &numeric {
            summary_stats.push(summarize_numeric(table.series(name)?)?);
        }

        let correlations = if numeric.len() >= 2 {
            Some(correlation_matrix(table, &numeric)?)
        } else {
            None
        };

        let numeric_columns = if numeric.is_empty() {
            None
        } else {
            Some(numeric)
        };

        let result = AnalysisResult {
            shape: table.shape(),
            columns,
            column_overviews,
            summary_stats,
            numeric_columns,
            correlations,
        };

        debug!(
            "Analyzed {} rows x {} columns: {} numeric, {} missing cells",
            result.shape.0,
            result.shape.1,
            result.numeric_column_count(),
            result.total_nulls()
        );

        Ok(Some(result))
    }
}
