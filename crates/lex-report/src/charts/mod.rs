//! Chart rendering.
//!
//! Up to three PNG images are written into the output directory, each under
//! a fixed file name so a re-run overwrites the previous images:
//!
//! | Chart | Condition |
//! |-------|-----------|
//! | Distribution histogram | at least one numeric column |
//! | Correlation heatmap | at least two numeric columns |
//! | Category bar chart | at least one categorical column |
//!
//! Drawing code returns `anyhow::Result`; failures are mapped to
//! [`ReportError::ChartRenderingFailed`] here.

mod bar;
mod heatmap;
mod histogram;

pub use bar::{CategoryCount, top_categories};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::types::{AnalysisResult, ChartArtifact, ChartKind, ColumnKind, Table};
use crate::utils::finite_values;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Renders the chart images for one analyzed table.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    histogram_bins: usize,
    top_categories: usize,
    histogram_column: Option<String>,
    category_column: Option<String>,
    chart_size: (u32, u32),
    heatmap_size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            histogram_bins: config.histogram_bins,
            top_categories: config.top_categories,
            histogram_column: config.histogram_column.clone(),
            category_column: config.category_column.clone(),
            chart_size: (config.chart_width, config.chart_height),
            heatmap_size: config.heatmap_size(),
        }
    }

    /// Render every chart whose condition holds, in placement order.
    ///
    /// The output directory must already exist.
    pub fn render(&self, table: &Table, analysis: &AnalysisResult) -> Result<Vec<ChartArtifact>> {
        let mut artifacts = Vec::with_capacity(3);

        if let Some(numeric) = &analysis.numeric_columns {
            let column = self.pick_column(
                table,
                self.histogram_column.as_deref(),
                numeric,
                ColumnKind::Numeric,
            )?;
            if let Some(artifact) = self.render_distribution(table, &column)? {
                artifacts.push(artifact);
            }
        }

        if let Some(matrix) = &analysis.correlations {
            let artifact = ChartArtifact::new(ChartKind::CorrelationHeatmap, &self.output_dir);
            heatmap::draw(&artifact.path, matrix, self.heatmap_size)
                .map_err(|e| chart_error(artifact.kind, e))?;
            info!("Saved {}", artifact.path.display());
            artifacts.push(artifact);
        }

        let categorical = table.columns_of_kind(ColumnKind::Categorical);
        if !categorical.is_empty() {
            let column = self.pick_column(
                table,
                self.category_column.as_deref(),
                &categorical,
                ColumnKind::Categorical,
            )?;
            if let Some(artifact) = self.render_categories(table, &column)? {
                artifacts.push(artifact);
            }
        }

        debug!("Rendered {} chart(s)", artifacts.len());
        Ok(artifacts)
    }

    /// Use the configured column when set, otherwise the first candidate.
    fn pick_column(
        &self,
        table: &Table,
        requested: Option<&str>,
        candidates: &[String],
        kind: ColumnKind,
    ) -> Result<String> {
        match requested {
            Some(name) => match table.kind_of(name) {
                None => Err(ReportError::ColumnNotFound(name.to_string())),
                Some(found) if found != kind => Err(ReportError::InvalidConfig(format!(
                    "column '{}' is {}, expected {}",
                    name, found, kind
                ))),
                Some(_) => Ok(name.to_string()),
            },
            None => candidates
                .first()
                .cloned()
                .ok_or_else(|| ReportError::InvalidConfig(format!("no {} column", kind))),
        }
    }

    fn render_distribution(&self, table: &Table, column: &str) -> Result<Option<ChartArtifact>> {
        let mut values = finite_values(table.series(column)?)?;
        if values.is_empty() {
            warn!("Column '{}' has no values, skipping histogram", column);
            return Ok(None);
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let buckets = histogram::build_histogram(&values, self.histogram_bins);
        if buckets.is_empty() {
            warn!("Column '{}' has an unplottable range, skipping histogram", column);
            return Ok(None);
        }

        let artifact = ChartArtifact::new(ChartKind::Distribution, &self.output_dir);
        histogram::draw(&artifact.path, column, &buckets, self.chart_size)
            .map_err(|e| chart_error(artifact.kind, e))?;

        info!("Saved {}", artifact.path.display());
        Ok(Some(artifact))
    }

    fn render_categories(&self, table: &Table, column: &str) -> Result<Option<ChartArtifact>> {
        let counts = top_categories(table.series(column)?, self.top_categories)?;
        if counts.is_empty() {
            warn!("Column '{}' has no values, skipping bar chart", column);
            return Ok(None);
        }

        let artifact = ChartArtifact::new(ChartKind::CategoryBar, &self.output_dir);
        bar::draw(
            &artifact.path,
            column,
            &counts,
            self.top_categories,
            self.chart_size,
        )
        .map_err(|e| chart_error(artifact.kind, e))?;

        info!("Saved {}", artifact.path.display());
        Ok(Some(artifact))
    }
}

/// Label of the category slot at integer position `v`, empty between slots.
///
/// Category axes are plain `-0.5..n - 0.5` ranges with one slot per integer.
pub(crate) fn slot_label(labels: &[String], v: f64) -> String {
    let slot = v.round();
    if (v - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

/// Axis range holding `slots` integer-centred category slots.
pub(crate) fn slot_range(slots: usize) -> std::ops::Range<f64> {
    -0.5..slots as f64 - 0.5
}

fn chart_error(kind: ChartKind, err: anyhow::Error) -> ReportError {
    ReportError::ChartRenderingFailed {
        chart: kind.display_name().to_string(),
        reason: format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> Table {
        Table::new(
            df!(
                "amount" => &[1.0, 2.0, 3.0],
                "region" => &["North", "South", "North"]
            )
            .unwrap(),
        )
    }

    fn renderer(histogram: Option<&str>) -> ChartRenderer {
        let mut config = ReportConfig::default();
        config.histogram_column = histogram.map(String::from);
        ChartRenderer::new(&config)
    }

    #[test]
    fn test_pick_first_candidate_by_default() {
        let table = table();
        let column = renderer(None)
            .pick_column(&table, None, &["amount".to_string()], ColumnKind::Numeric)
            .unwrap();
        assert_eq!(column, "amount");
    }

    #[test]
    fn test_pick_unknown_column() {
        let table = table();
        let err = renderer(None)
            .pick_column(&table, Some("price"), &[], ColumnKind::Numeric)
            .unwrap_err();
        assert!(matches!(err, ReportError::ColumnNotFound(name) if name == "price"));
    }

    #[test]
    fn test_pick_column_of_wrong_kind() {
        let table = table();
        let err = renderer(None)
            .pick_column(&table, Some("region"), &[], ColumnKind::Numeric)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_slot_labels_only_on_integer_ticks() {
        let labels = vec!["North".to_string(), "South".to_string()];

        assert_eq!(slot_label(&labels, 0.0), "North");
        assert_eq!(slot_label(&labels, 1.0000000001), "South");
        assert_eq!(slot_label(&labels, 0.5), "");
        assert_eq!(slot_label(&labels, -1.0), "");
        assert_eq!(slot_label(&labels, 2.0), "");
    }

    #[test]
    fn test_slot_range_is_centred_on_slots() {
        assert_eq!(slot_range(3), -0.5..2.5);
        assert_eq!(slot_range(1), -0.5..0.5);
    }

    #[test]
    fn test_overflowing_range_skips_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ReportConfig::default();
        config.output_dir = dir.path().to_path_buf();
        let table = Table::new(df!("amount" => &[-1e308, 0.0, 1e308]).unwrap());

        let artifact = ChartRenderer::new(&config)
            .render_distribution(&table, "amount")
            .unwrap();

        assert!(artifact.is_none());
        assert!(!dir.path().join("distribution_plot.png").exists());
    }

    #[test]
    fn test_heatmap_is_taller_than_wide_charts() {
        let renderer = renderer(Some("amount"));
        assert_eq!(renderer.chart_size, (1000, 600));
        assert_eq!(renderer.heatmap_size, (1000, 800));
        assert_eq!(renderer.histogram_column.as_deref(), Some("amount"));
    }
}
