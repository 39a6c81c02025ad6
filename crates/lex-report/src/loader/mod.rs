//! Data loading.
//!
//! Reads one tabular dataset from disk into a [`Table`]. The format is chosen
//! from the file extension before anything is read:
//!
//! - `.csv`: delimited text with a header row
//! - `.json`: a top-level array of flat records

mod csv;
mod json;

use crate::error::{ReportError, Result};
use crate::types::Table;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Input formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Pick the format from the lowercase file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load a dataset, dispatching on its extension.
///
/// Unsupported extensions fail with [`ReportError::UnsupportedFormat`]
/// without touching the file; read or parse failures become
/// [`ReportError::LoadFailed`].
pub fn load_table(path: &Path) -> Result<Table> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| ReportError::UnsupportedFormat(path.display().to_string()))?;

    debug!("Loading {} file {}", format, path.display());

    let data = match format {
        SourceFormat::Csv => csv::read_csv(path),
        SourceFormat::Json => json::read_json(path),
    }
    .map_err(|e| ReportError::load_failed(path, format!("{:#}", e)))?;

    let table = Table::new(data);
    info!(
        "Successfully loaded {} data: {} rows, {} columns",
        format,
        table.height(),
        table.width()
    );

    Ok(table)
}
