//! Column kind inference.

use crate::types::ColumnKind;
use crate::utils::{DtypeCategory, get_dtype_category};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

/// Number of leading non-null values inspected when looking for dates in text.
const DATE_SAMPLE_SIZE: usize = 10;

/// Infer the semantic kind of a column from its dtype and, for text, its content.
pub(crate) fn infer_column_kind(series: &Series) -> ColumnKind {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => ColumnKind::Numeric,
        DtypeCategory::Datetime => ColumnKind::Temporal,
        DtypeCategory::String if is_date_like_text(series) => ColumnKind::Temporal,
        DtypeCategory::String | DtypeCategory::Boolean | DtypeCategory::Other => {
            ColumnKind::Categorical
        }
    }
}

/// Check if a string column holds formatted dates rather than labels.
pub(crate) fn is_date_like_text(series: &Series) -> bool {
    let Ok(str_series) = series.str() else {
        return false;
    };

    let samples: Vec<&str> = str_series
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(DATE_SAMPLE_SIZE)
        .collect();

    if samples.is_empty() {
        return false;
    }

    let date_like_count = samples
        .iter()
        .filter(|s| s.parse::<f64>().is_err())
        .filter(|s| DATE_PATTERNS.iter().any(|pattern| pattern.is_match(s)))
        .count();

    // Need more than 70% of checked samples to be date-like
    (date_like_count as f64 / samples.len() as f64) > 0.7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_numeric_native_int() {
        let series = Series::new("count".into(), &[1i64, 2, 3, 4, 5]);
        assert_eq!(infer_column_kind(&series), ColumnKind::Numeric);
    }

    #[test]
    fn test_kind_numeric_native_float_with_nulls() {
        let series = Series::new("price".into(), &[Some(1.5f64), None, Some(3.5)]);
        assert_eq!(infer_column_kind(&series), ColumnKind::Numeric);
    }

    #[test]
    fn test_kind_string_categorical() {
        let series = Series::new("category".into(), &["red", "blue", "green", "red"]);
        assert_eq!(infer_column_kind(&series), ColumnKind::Categorical);
    }

    #[test]
    fn test_kind_boolean_is_categorical() {
        let series = Series::new("active".into(), &[true, false, true]);
        assert_eq!(infer_column_kind(&series), ColumnKind::Categorical);
    }

    #[test]
    fn test_kind_all_null_is_categorical() {
        let series = Series::new_null("empty".into(), 3);
        assert_eq!(infer_column_kind(&series), ColumnKind::Categorical);
    }

    #[test]
    fn test_kind_iso_date_strings_are_temporal() {
        let series = Series::new("date".into(), &["2024-01-15", "2024-02-20", "2024-03-25"]);
        assert_eq!(infer_column_kind(&series), ColumnKind::Temporal);
    }

    #[test]
    fn test_kind_timestamp_strings_are_temporal() {
        let series = Series::new(
            "timestamp".into(),
            &["2024-01-15T10:30:00", "2024-02-20T14:45:00"],
        );
        assert_eq!(infer_column_kind(&series), ColumnKind::Temporal);
    }

    #[test]
    fn test_kind_us_dates_are_temporal() {
        let series = Series::new("day".into(), &["01/15/2024", "02/20/2024", "3/5/2024"]);
        assert_eq!(infer_column_kind(&series), ColumnKind::Temporal);
    }

    #[test]
    fn test_mostly_labels_are_not_dates() {
        let series = Series::new(
            "mixed".into(),
            &["2024-01-15", "North", "South", "East", "West"],
        );
        assert!(!is_date_like_text(&series));
    }

    #[test]
    fn test_native_date_is_temporal() {
        let series = Series::new("d".into(), &[19000i32, 19001, 19002])
            .cast(&DataType::Date)
            .unwrap();
        assert_eq!(infer_column_kind(&series), ColumnKind::Temporal);
    }
}
