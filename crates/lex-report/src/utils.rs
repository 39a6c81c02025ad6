//! Shared utilities for the report pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a physical data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date, datetime or time types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/categorical type
    String,
    /// Other/unknown types (lists, structs, nulls)
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Missing Value Markers
// =============================================================================

/// Cell contents read as missing values in delimited input.
pub const NULL_MARKERS: [&str; 9] = [
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A",
];

// =============================================================================
// Formatting Utilities
// =============================================================================

/// Placeholder printed for statistics that could not be computed.
pub const MISSING_PLACEHOLDER: &str = "N/A";

/// Format a statistic with two decimals, or the placeholder when absent.
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => MISSING_PLACEHOLDER.to_string(),
    }
}

/// Truncate a label to `max_chars` characters, ending with an ellipsis when cut.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Extract plain `f64` values from a Series, skipping nulls and NaNs.
pub fn finite_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
