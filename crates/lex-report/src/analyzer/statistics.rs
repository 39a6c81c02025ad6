//! Descriptive statistics for numeric columns.

use crate::types::NumericSummary;
use crate::utils::finite_values;
use polars::prelude::*;

/// Compute count, mean, std, min, quartiles and max of a numeric column.
///
/// Nulls and non-finite values are ignored. Std uses the sample (n - 1)
/// denominator and quartiles interpolate linearly.
pub(crate) fn summarize_numeric(series: &Series) -> PolarsResult<NumericSummary> {
    let values = Float64Chunked::from_vec(series.name().clone(), finite_values(series)?);
    let quartile = |q: f64| values.quantile(q, QuantileMethod::Linear);

    Ok(NumericSummary {
        column: series.name().to_string(),
        count: values.len(),
        mean: values.mean(),
        std: values.std(1),
        min: values.min(),
        q25: quartile(0.25)?,
        median: quartile(0.5)?,
        q75: quartile(0.75)?,
        max: values.max(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn summarize(values: &[f64]) -> NumericSummary {
        summarize_numeric(&Series::new("v".into(), values)).unwrap()
    }

    // ==================== std tests ====================

    #[test]
    fn test_std_uses_sample_denominator() {
        // Mean = 3, Variance = 10/4 = 2.5
        let std = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).std.unwrap();
        assert!(approx(std, 2.5f64.sqrt()));
    }

    #[test]
    fn test_std_identical_values() {
        assert_eq!(summarize(&[5.0, 5.0, 5.0, 5.0]).std, Some(0.0));
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quartiles_interpolate_between_values() {
        let summary = summarize(&[4.0, 1.0, 3.0, 2.0]);
        assert!(approx(summary.q25.unwrap(), 1.75));
        assert!(approx(summary.median.unwrap(), 2.5));
        assert!(approx(summary.q75.unwrap(), 3.25));
    }

    #[test]
    fn test_quartiles_hit_exact_values() {
        let summary = summarize(&[10.0, 20.0, 30.0]);
        assert_eq!(summary.min, Some(10.0));
        assert_eq!(summary.median, Some(20.0));
        assert_eq!(summary.max, Some(30.0));
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let summary = summarize(&[1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, Some(2.0));
        assert_eq!(summary.max, Some(3.0));
    }

    // ==================== summarize_numeric tests ====================

    #[test]
    fn test_summarize_numeric_skips_nulls() {
        let series = Series::new(
            "price".into(),
            &[Some(10.0f64), None, Some(30.0), Some(20.0), Some(40.0)],
        );
        let summary = summarize_numeric(&series).unwrap();

        assert_eq!(summary.column, "price");
        assert_eq!(summary.count, 4);
        assert!(approx(summary.mean.unwrap(), 25.0));
        assert_eq!(summary.min, Some(10.0));
        assert_eq!(summary.max, Some(40.0));
        assert!(approx(summary.q25.unwrap(), 17.5));
        assert!(approx(summary.median.unwrap(), 25.0));
        assert!(approx(summary.q75.unwrap(), 32.5));
        assert!(approx(summary.std.unwrap(), (500.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_summarize_integer_column() {
        let series = Series::new("visits".into(), &[3i64, 1, 2]);
        let summary = summarize_numeric(&series).unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, Some(2.0));
        assert_eq!(summary.median, Some(2.0));
    }

    #[test]
    fn test_summarize_all_null_column() {
        let series = Series::new("empty".into(), &[None::<f64>, None]);
        let summary = summarize_numeric(&series).unwrap();

        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_none());
        assert!(summary.min.is_none());
        assert!(summary.max.is_none());
        assert!(summary.std.is_none());
        assert!(summary.median.is_none());
    }

    #[test]
    fn test_summarize_single_value() {
        let series = Series::new("one".into(), &[7.5f64]);
        let summary = summarize_numeric(&series).unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, Some(7.5));
        assert_eq!(summary.std, None);
        assert_eq!(summary.q25, Some(7.5));
    }
}
