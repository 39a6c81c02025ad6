//! Delimited text input.

use crate::utils::NULL_MARKERS;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Rows scanned by polars to infer column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Read a CSV file with a header row.
///
/// A file holding only a header produces an empty frame with one String
/// column per header field. Malformed content is retried without quote
/// handling, then once more after cleaning.
pub(super) fn read_csv(path: &Path) -> Result<DataFrame> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read file {}", path.display()))?;

    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().context("File is empty")?;
    if lines.next().is_none() {
        debug!("CSV contains a header only");
        return header_only_frame(header);
    }

    // Strategy 1: Standard loading with quote handling
    match read_from_content(content.clone(), Some(b'"')) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match read_from_content(content.clone(), None) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    read_from_content(clean_csv_content(&content), Some(b'"'))
        .context("CSV could not be parsed after cleaning")
}

fn read_from_content(content: String, quote_char: Option<u8>) -> PolarsResult<DataFrame> {
    let null_values = NULL_MARKERS.iter().map(|m| (*m).into()).collect();

    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(quote_char)
                .with_try_parse_dates(true)
                .with_null_values(Some(NullValues::AllColumns(null_values))),
        )
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()
}

fn header_only_frame(header: &str) -> Result<DataFrame> {
    let columns: Vec<Column> = header
        .split(',')
        .map(|name| name.trim().trim_matches('"'))
        .map(|name| Series::new_empty(name.into(), &DataType::String).into_column())
        .collect();

    DataFrame::new(columns).context("Invalid header row")
}

/// Clean CSV content
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
