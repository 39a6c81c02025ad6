//! Pearson correlation over numeric columns.

use crate::types::{CorrelationMatrix, Table};
use polars::prelude::*;
use statrs::statistics::Statistics;

/// Minimum number of complete pairs for a correlation to be reported.
const MIN_PAIRS: usize = 2;

/// Build the pairwise-complete Pearson matrix for `columns` (all numeric).
pub(crate) fn correlation_matrix(
    table: &Table,
    columns: &[String],
) -> PolarsResult<CorrelationMatrix> {
    let mut series_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let casted = table.series(name)?.cast(&DataType::Float64)?;
        let values = casted
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        series_values.push(values);
    }

    let size = columns.len();
    let mut values = vec![vec![None; size]; size];

    for i in 0..size {
        values[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let (x, y): (Vec<f64>, Vec<f64>) = series_values[i]
                .iter()
                .zip(series_values[j].iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();

            let estimate = pearson(&x, &y);
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Pearson correlation coefficient of two equally long samples.
///
/// Returns `None` for fewer than two pairs or when either side is constant.
/// Both samples are divided by their largest magnitude first; the coefficient
/// is scale-free and the sums of squares then stay finite near `f64::MAX`.
pub(crate) fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < MIN_PAIRS {
        return None;
    }

    let x = unit_scaled(&x[..n])?;
    let y = unit_scaled(&y[..n])?;

    let denominator = x.iter().std_dev() * y.iter().std_dev();
    if denominator.is_nan() || denominator <= f64::EPSILON {
        return None;
    }

    let r = x.iter().covariance(y.iter()) / denominator;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn unit_scaled(values: &[f64]) -> Option<Vec<f64>> {
    let scale = values.iter().fold(0.0f64, |max, v| max.max(v.abs()));
    (scale > 0.0 && scale.is_finite()).then(|| values.iter().map(|v| v / scale).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_positive() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson(&[1.0, 2.0, 3.0], &[9.0, 6.0, 3.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_side_is_undefined() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn test_pearson_too_few_pairs() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_pearson_survives_values_near_f64_max() {
        let r = pearson(&[-1e308, 1e308, 0.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_all_zero_side_is_undefined() {
        assert_eq!(pearson(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_matrix_of_extreme_values_is_defined() {
        let df = df!(
            "a" => &[-1e308, 1e308, 0.0],
            "b" => &[1.0, 2.0, 3.0]
        )
        .unwrap();
        let table = Table::new(df);
        let columns = vec!["a".to_string(), "b".to_string()];

        let matrix = correlation_matrix(&table, &columns).unwrap();

        assert!((matrix.get(0, 1).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_uses_pairwise_complete_rows() {
        let df = df!(
            "a" => &[Some(1.0), Some(2.0), None, Some(4.0)],
            "b" => &[Some(10.0), Some(20.0), Some(99.0), Some(40.0)],
            "c" => &[Some(4.0), Some(3.0), Some(2.0), Some(1.0)]
        )
        .unwrap();
        let table = Table::new(df);
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let matrix = correlation_matrix(&table, &columns).unwrap();

        assert_eq!(matrix.dimension(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), Some(1.0));
        }
        // Row 3 is skipped for (a, b), leaving a perfectly linear relation
        assert!((matrix.get(0, 1).unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get(1, 2).unwrap() - matrix.get(2, 1).unwrap()).abs() < 1e-15);
        assert!(matrix.get(0, 2).unwrap() < 0.0);
    }
}
