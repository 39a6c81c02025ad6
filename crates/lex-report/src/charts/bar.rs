//! Bar chart of the most frequent values of a categorical column.

use super::{slot_label, slot_range};
use crate::utils::truncate_label;
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(240, 128, 128);

/// Longest tick label before it is shortened.
const LABEL_CHARS: usize = 15;

/// Frequency of one distinct value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Up to `limit` most frequent non-null values, most frequent first.
///
/// Equal counts keep the order in which the values first appear.
pub fn top_categories(series: &Series, limit: usize) -> PolarsResult<Vec<CategoryCount>> {
    let casted = series.cast(&DataType::String)?;

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in casted.str()?.into_iter().flatten().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    let mut entries: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first_seen))| (value, count, first_seen))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    Ok(entries
        .into_iter()
        .take(limit)
        .map(|(value, count, _)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect())
}

/// Draw one bar per entry of `counts` (non-empty) to `path`, each labelled with its count.
pub(crate) fn draw(
    path: &Path,
    column: &str,
    counts: &[CategoryCount],
    limit: usize,
    size: (u32, u32),
) -> Result<()> {
    let bars = counts.len();
    let y_max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1) as f64 * 1.15;
    let labels: Vec<String> = counts
        .iter()
        .map(|c| truncate_label(&c.value, LABEL_CHARS))
        .collect();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    {
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Top {} Values in {}", limit, column),
                ("sans-serif", 30),
            )
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(slot_range(bars), 0f64..y_max)?;

        let tick_label = |v: &f64| slot_label(&labels, *v);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars)
            .x_label_formatter(&tick_label)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(column)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, c.count as f64)], BAR_COLOR.filled())
        }))?;

        chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
            let style = ("sans-serif", 16)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            Text::new(c.count.to_string(), (i as f64, c.count as f64), style)
        }))?;
    }

    root.present()?;
    Ok(())
}
