use super::document::PdfWriter;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::types::{AnalysisResult, ChartArtifact, Statistic, Table};
use crate::utils::format_stat;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Chart images are placed at a fixed size in inches.
const IMAGE_WIDTH_IN: f32 = 6.0;
const IMAGE_HEIGHT_IN: f32 = 4.0;

const SECTION_SPACE: f32 = 12.0;

const INSIGHTS: [&str; 3] = [
    "1. The dataset is mostly complete with very few missing values.",
    "2. The numerical analysis shows stable average values and meaningful variance.",
    "3. Categorical and correlation visualizations give actionable insights.",
];

const RECOMMENDATIONS: [&str; 3] = [
    "\u{2022} Maintain data quality with validation checks",
    "\u{2022} Use correlations to inform feature selection",
    "\u{2022} Conduct regular analysis for ongoing insights",
];

// ============================================================================
// Summary sidecar
// ============================================================================

/// JSON summary written next to the document when enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the PDF document
    pub report_file: String,
    pub analysis: AnalysisResult,
    pub charts: Vec<ChartArtifact>,
}

// ============================================================================
// Generator
// ============================================================================

/// Lays out the PDF document for one analyzed table.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_filename: String,
    title: String,
}

impl ReportGenerator {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            output_filename: config.output_filename.clone(),
            title: config.title.clone(),
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }

    /// Build and save the document, returning its path.
    ///
    /// Charts are placed in list order; a chart whose file has disappeared
    /// is left out.
    pub fn generate(
        &self,
        table: &Table,
        analysis: &AnalysisResult,
        charts: &[ChartArtifact],
    ) -> Result<PathBuf> {
        let mut doc = PdfWriter::new(&self.title)?;

        doc.title(&self.title);
        doc.spacer(SECTION_SPACE);

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        doc.field("Report Generated:", &generated_at);
        doc.field(
            "Data Shape:",
            &format!("{} rows, {} columns", table.height(), table.width()),
        );
        doc.field("Data Columns:", &analysis.columns.join(", "));
        doc.spacer(SECTION_SPACE);

        doc.heading("Executive Summary");
        doc.paragraph(&executive_summary(analysis));
        doc.spacer(SECTION_SPACE);

        doc.heading("Data Quality Assessment");
        doc.paragraph(&data_quality_text(analysis));
        doc.spacer(SECTION_SPACE);

        if let Some((header, rows)) = statistics_rows(analysis) {
            doc.heading("Summary Statistics");
            doc.table(&header, &rows);
        }

        doc.heading("Data Visualizations");
        let mut placed = 0;
        for chart in charts {
            if doc.image(&chart.path, IMAGE_WIDTH_IN, IMAGE_HEIGHT_IN)? {
                doc.spacer(SECTION_SPACE);
                placed += 1;
            }
        }
        debug!("Placed {} of {} chart(s)", placed, charts.len());

        doc.heading("Key Insights and Recommendations");
        for line in INSIGHTS {
            doc.paragraph(line);
        }
        doc.spacer(SECTION_SPACE);
        doc.bold_line("Recommendations:");
        for line in RECOMMENDATIONS {
            doc.paragraph(line);
        }

        let path = self.report_path();
        doc.save(&path)?;
        info!("Report saved: {}", path.display());

        Ok(path)
    }

    /// Write the JSON summary as `<stem>_summary.json` in the output directory.
    pub fn write_summary_json(
        &self,
        analysis: &AnalysisResult,
        charts: &[ChartArtifact],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.report_path();
        let stem = Path::new(&self.output_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("analysis_report");
        let summary = ReportSummary {
            generated_at: Local::now().to_rfc3339(),
            report_file: report_path.display().to_string(),
            analysis: analysis.clone(),
            charts: charts.to_vec(),
        };

        let summary_path = self.output_dir.join(format!("{}_summary.json", stem));
        let mut file = File::create(&summary_path)?;
        file.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

        info!("Summary saved: {}", summary_path.display());

        Ok(summary_path)
    }
}

// ============================================================================
// Narrative
// ============================================================================

/// Opening paragraph: size of the dataset and the spread of column means.
pub fn executive_summary(analysis: &AnalysisResult) -> String {
    let (rows, cols) = analysis.shape;
    let mut text = format!(
        "This report presents a comprehensive analysis of the dataset with {} records \
         and {} features. There are {} numeric columns.",
        rows,
        cols,
        analysis.numeric_column_count()
    );

    if let Some((min, max)) = analysis.mean_range() {
        text.push_str(&format!(
            " Average values range from {:.2} to {:.2}.",
            min, max
        ));
    }

    text
}

/// Missing-value sentence for the quality section.
pub fn data_quality_text(analysis: &AnalysisResult) -> String {
    let total = analysis.total_nulls();
    if total == 0 {
        return "No missing values found in the dataset.".to_string();
    }

    format!(
        "{} missing values ({:.2}%). Affected columns: {}.",
        total,
        analysis.null_percentage(),
        analysis.columns_with_nulls().join(", ")
    )
}

/// Header and body rows of the statistics grid, or `None` without numeric columns.
pub fn statistics_rows(analysis: &AnalysisResult) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    if analysis.summary_stats.is_empty() {
        return None;
    }

    let mut header = vec!["Statistic".to_string()];
    header.extend(analysis.summary_stats.iter().map(|s| s.column.clone()));

    let rows = Statistic::ALL
        .iter()
        .map(|stat| {
            let mut row = vec![stat.label().to_string()];
            row.extend(
                analysis
                    .summary_stats
                    .iter()
                    .map(|summary| format_stat(stat.value(summary))),
            );
            row
        })
        .collect();

    Some((header, rows))
}
