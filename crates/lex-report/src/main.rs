//! CLI entry point for the data analysis report generator.

use anyhow::Result;
use clap::Parser;
use lex_report::{ReportConfig, ReportPipeline, RunOutcome, RunSummary};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Batch data analysis report generator",
    long_about = "Loads a CSV or JSON dataset, computes descriptive statistics and \
                  correlations, draws charts and writes everything to a PDF report.\n\n\
                  EXAMPLES:\n  \
                  # Analyze a CSV file\n  \
                  lex-report sales.csv\n\n  \
                  # Custom output directory and title\n  \
                  lex-report data.json -o out/ --title \"Q3 Review\"\n\n  \
                  # No input: analyze a generated sample dataset\n  \
                  lex-report"
)]
struct Args {
    /// Path to the CSV or JSON file to analyze
    ///
    /// If omitted, a synthetic sales dataset is generated and analyzed
    input: Option<PathBuf>,

    /// Output directory for charts, sample data and the report
    #[arg(short, long, default_value = lex_report::config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// File name of the generated PDF
    #[arg(long, default_value = lex_report::config::DEFAULT_OUTPUT_FILENAME)]
    output_name: String,

    /// Title printed on the first page
    #[arg(long, default_value = lex_report::config::DEFAULT_TITLE)]
    title: String,

    /// Number of histogram bins
    #[arg(long, default_value = "20")]
    bins: usize,

    /// Maximum number of bars in the category chart
    #[arg(long, default_value = "10")]
    top_categories: usize,

    /// Column to draw in the histogram (default: first numeric column)
    #[arg(long)]
    histogram_column: Option<String>,

    /// Column to draw in the category chart (default: first categorical column)
    #[arg(long)]
    category_column: Option<String>,

    /// Seed for the generated sample dataset
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Suppress progress output (only show errors and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Write a JSON summary of the analysis next to the report
    ///
    /// The summary will be saved as <report_name>_summary.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);
    debug!("Arguments: {:?}", args);

    let mut config_builder = ReportConfig::builder()
        .output_dir(&args.output_dir)
        .output_filename(&args.output_name)
        .title(&args.title)
        .histogram_bins(args.bins)
        .top_categories(args.top_categories)
        .sample_seed(args.seed)
        .emit_json_summary(args.emit_report);

    if let Some(ref column) = args.histogram_column {
        config_builder = config_builder.histogram_column(column);
    }

    if let Some(ref column) = args.category_column {
        config_builder = config_builder.category_column(column);
    }

    let config = config_builder.build()?;

    let mut builder = ReportPipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| println!("{}", update.message));
    }

    let pipeline = builder.build()?;

    match pipeline.run(args.input.as_deref())? {
        RunOutcome::Completed(summary) => {
            print_summary(&summary, args.quiet);
            Ok(())
        }
        RunOutcome::Aborted(reason) => {
            // Unusable input ends the run without a failing exit status
            info!("Run aborted ({}): {}", reason.error_code(), reason);
            Ok(())
        }
    }
}

/// Print where the artifacts of a completed run were written.
fn print_summary(summary: &RunSummary, quiet: bool) {
    if quiet {
        println!("{}", summary.report_path.display());
        return;
    }

    info!(
        "Analyzed {} rows x {} columns, {} chart(s)",
        summary.shape.0,
        summary.shape.1,
        summary.charts.len()
    );
    for chart in &summary.charts {
        info!("  {}: {}", chart.kind.display_name(), chart.path.display());
    }
    if let Some(ref path) = summary.summary_path {
        println!("Summary written to: {}", path.display());
    }
}
