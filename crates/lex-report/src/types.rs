use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Table
// ============================================================================

/// Semantic kind of a column, inferred once when the table is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values.
    Numeric,
    /// Free text, labels, booleans and anything else that is counted rather than measured.
    Categorical,
    /// Dates, datetimes and date-like strings.
    Temporal,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Temporal => "temporal",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of named columns together with their inferred kinds.
///
/// Built by the loader and only read afterwards.
#[derive(Debug, Clone)]
pub struct Table {
    data: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Table {
    /// Wrap a DataFrame, inferring one [`ColumnKind`] per column.
    pub fn new(data: DataFrame) -> Self {
        let kinds = data
            .get_columns()
            .iter()
            .map(|column| crate::analyzer::infer_column_kind(column.as_materialized_series()))
            .collect();
        Self { data, kinds }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// A table with no rows or no columns carries nothing to analyze.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Column names of the given kind, in table order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .zip(&self.kinds)
            .filter(|(_, k)| **k == kind)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.data
            .get_column_index(name)
            .and_then(|idx| self.kinds.get(idx).copied())
    }

    pub fn series(&self, name: &str) -> PolarsResult<&Series> {
        Ok(self.data.column(name)?.as_materialized_series())
    }
}

// ============================================================================
// Analysis result
// ============================================================================

/// Descriptive statistics of one numeric column.
///
/// Every value except `count` is absent when the column has no non-null
/// values; `std` is also absent for a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Rows of the statistics table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Count,
    Mean,
    Std,
    Min,
    Q25,
    Median,
    Q75,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Count,
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Q25,
        Statistic::Median,
        Statistic::Q75,
        Statistic::Max,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Min => "min",
            Self::Q25 => "25%",
            Self::Median => "50%",
            Self::Q75 => "75%",
            Self::Max => "max",
        }
    }

    pub fn value(&self, summary: &NumericSummary) -> Option<f64> {
        match self {
            Self::Count => Some(summary.count as f64),
            Self::Mean => summary.mean,
            Self::Std => summary.std,
            Self::Min => summary.min,
            Self::Q25 => summary.q25,
            Self::Median => summary.median,
            Self::Q75 => summary.q75,
            Self::Max => summary.max,
        }
    }
}

/// Pairwise Pearson correlation over the numeric columns.
///
/// `values[i][j]` is `None` when the pair has too few complete observations
/// or one side is constant. The diagonal is always `Some(1.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn dimension(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

/// Per-column metadata recorded by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverview {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
    pub null_count: usize,
}

/// Snapshot derived once from a [`Table`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// (rows, columns)
    pub shape: (usize, usize),
    /// Column names in table order.
    pub columns: Vec<String>,
    /// Name, dtype, kind and null count for each column, in table order.
    pub column_overviews: Vec<ColumnOverview>,
    /// One entry per numeric column, in table order.
    pub summary_stats: Vec<NumericSummary>,
    /// Present when at least one numeric column exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_columns: Option<Vec<String>>,
    /// Present when at least two numeric columns exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationMatrix>,
}

impl AnalysisResult {
    pub fn total_nulls(&self) -> usize {
        self.column_overviews.iter().map(|c| c.null_count).sum()
    }

    pub fn total_cells(&self) -> usize {
        self.shape.0.saturating_mul(self.shape.1)
    }

    /// Percentage of all cells that are missing.
    pub fn null_percentage(&self) -> f64 {
        let cells = self.total_cells();
        if cells == 0 {
            0.0
        } else {
            self.total_nulls() as f64 / cells as f64 * 100.0
        }
    }

    /// Columns with at least one missing value, in table order.
    pub fn columns_with_nulls(&self) -> Vec<&str> {
        self.column_overviews
            .iter()
            .filter(|c| c.null_count > 0)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn numeric_column_count(&self) -> usize {
        self.numeric_columns.as_ref().map_or(0, Vec::len)
    }

    /// Smallest and largest per-column mean over the numeric columns.
    pub fn mean_range(&self) -> Option<(f64, f64)> {
        self.summary_stats
            .iter()
            .filter_map(|s| s.mean)
            .fold(None, |acc, mean| match acc {
                None => Some((mean, mean)),
                Some((lo, hi)) => Some((lo.min(mean), hi.max(mean))),
            })
    }
}

// ============================================================================
// Charts
// ============================================================================

/// The three chart kinds, each with a fixed file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Distribution,
    CorrelationHeatmap,
    CategoryBar,
}

impl ChartKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Distribution => "distribution_plot.png",
            Self::CorrelationHeatmap => "correlation_heatmap.png",
            Self::CategoryBar => "categorical_bar_chart.png",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Distribution => "distribution histogram",
            Self::CorrelationHeatmap => "correlation heatmap",
            Self::CategoryBar => "category bar chart",
        }
    }
}

/// A rendered chart image on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub path: PathBuf,
}

impl ChartArtifact {
    pub fn new(kind: ChartKind, output_dir: &Path) -> Self {
        Self {
            kind,
            path: output_dir.join(kind.file_name()),
        }
    }
}
