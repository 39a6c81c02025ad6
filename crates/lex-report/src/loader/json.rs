//! JSON records input.
//!
//! Expected layout (records-oriented):
//!
//! ```json
//! [
//!   { "region": "North", "sales": 1200.5, "units": 3 },
//!   { "region": "South", "sales": 980.0 }
//! ]
//! ```

use anyhow::{Context, Result, bail};
use polars::prelude::*;
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

static MISSING: JsonValue = JsonValue::Null;

/// Read a top-level JSON array of objects into a frame.
///
/// Columns appear in first-seen key order and keys missing from a record
/// read as nulls.
pub(super) fn read_json(path: &Path) -> Result<DataFrame> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    records_to_frame(&records)
}

fn records_to_frame(records: &[&Map<String, JsonValue>]) -> Result<DataFrame> {
    let mut keys: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
    }

    let columns = keys
        .iter()
        .map(|key| {
            let values: Vec<&JsonValue> = records
                .iter()
                .map(|record| record.get(*key).unwrap_or(&MISSING))
                .collect();
            json_column(key, &values).into_column()
        })
        .collect::<Vec<_>>();

    if columns.iter().any(|c| c.len() != records.len()) {
        bail!("Inconsistent column lengths");
    }

    Ok(DataFrame::new(columns)?)
}

/// Build a typed series from the values of one key.
fn json_column(name: &str, values: &[&JsonValue]) -> Series {
    let present = || values.iter().filter(|v| !v.is_null());
    let any_present = present().next().is_some();

    if any_present && present().all(|v| v.is_i64()) {
        let data: Vec<Option<i64>> = values.iter().map(|v| v.as_i64()).collect();
        Series::new(name.into(), data)
    } else if any_present && present().all(|v| v.is_number()) {
        let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
        Series::new(name.into(), data)
    } else if any_present && present().all(|v| v.is_boolean()) {
        let data: Vec<Option<bool>> = values.iter().map(|v| v.as_bool()).collect();
        Series::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = values.iter().map(|v| json_to_text(v)).collect();
        Series::new(name.into(), data)
    }
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
