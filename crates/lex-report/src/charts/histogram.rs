//! Frequency histogram of one numeric column.

use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

/// One histogram bucket, `[start, end)` except for the last which is closed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split ascending `values` into `bins` equal-width buckets.
///
/// A constant column is spread over `[v - 0.5, v + 0.5]` so the bucket count
/// stays fixed. Returns no buckets when the span is not a positive finite
/// number, which happens when `max - min` overflows.
pub(crate) fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = values.first().copied().unwrap_or(0.0);
    let mut max = values.last().copied().unwrap_or(min);
    if (max - min).abs() < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }

    let span = max - min;
    let width = span / bins as f64;
    if !span.is_finite() || span <= 0.0 || width <= 0.0 {
        return Vec::new();
    }
    let mut counts = vec![0usize; bins];

    for value in values {
        let mut index = ((value - min) / width) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}

/// Draw `buckets` (non-empty, from [`build_histogram`]) to `path`.
pub(crate) fn draw(
    path: &Path,
    column: &str,
    buckets: &[HistogramBin],
    size: (u32, u32),
) -> Result<()> {
    let x_min = buckets.first().map_or(0.0, |b| b.start);
    let x_max = buckets.last().map_or(1.0, |b| b.end);
    let y_max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    {
        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Distribution of {}", column), ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(column)
            .y_desc("Frequency")
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()?;

        chart.draw_series(buckets.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BAR_COLOR.filled())
        }))?;
        chart.draw_series(buckets.iter().filter(|b| b.count > 0).map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLACK.stroke_width(1))
        }))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_count_is_fixed() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = build_histogram(&values, 20);

        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].start, 0.0);
        assert!((bins[19].end - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_value_lands_in_last_bucket() {
        let bins = build_histogram(&[0.0, 5.0, 10.0], 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn test_constant_values_keep_bucket_count() {
        let bins = build_histogram(&[3.0, 3.0, 3.0], 4);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!((bins[0].start - 2.5).abs() < 1e-12);
        assert!((bins[3].end - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_overflowing_span_has_no_buckets() {
        assert!(build_histogram(&[-1e308, 0.0, 1e308], 10).is_empty());
        assert!(build_histogram(&[f64::MAX, f64::MAX], 10).is_empty());
    }

    #[test]
    fn test_wide_but_finite_span_keeps_finite_edges() {
        let bins = build_histogram(&[-1e307, 0.0, 1e307], 10);

        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_draw_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distribution.png");
        let buckets = build_histogram(&[1.0, 2.0, 2.5, 4.0], 3);

        draw(&path, "amount", &buckets, (400, 300)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_values() {
        assert!(build_histogram(&[], 10).is_empty());
    }
}
