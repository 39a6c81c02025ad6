//! Annotated correlation heatmap.

use super::{slot_label, slot_range};
use crate::types::CorrelationMatrix;
use crate::utils::{format_stat, truncate_label};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);
const MISSING_COLOR: RGBColor = RGBColor(245, 245, 245);

/// Longest axis label before it is shortened.
const LABEL_CHARS: usize = 18;

/// Diverging blue-grey-red colour for a correlation in `[-1, 1]`, centred on 0.
pub(crate) fn diverging_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (NEUTRAL, COLD, -v)
    } else {
        (NEUTRAL, WARM, v)
    };

    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Plot coordinates of a cell centre; row 0 sits on the top slot.
fn cell_centre(n: usize, row: usize, col: usize) -> (f64, f64) {
    (col as f64, (n - 1 - row) as f64)
}

/// Draw the full matrix to `path`, one annotated cell per column pair.
pub(crate) fn draw(path: &Path, matrix: &CorrelationMatrix, size: (u32, u32)) -> Result<()> {
    let n = matrix.dimension();
    let labels: Vec<String> = matrix
        .columns
        .iter()
        .map(|c| truncate_label(c, LABEL_CHARS))
        .collect();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    {
        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Matrix", ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(80)
            .y_label_area_size(160)
            .build_cartesian_2d(slot_range(n), slot_range(n))?;

        // Row 0 is drawn at the top.
        let row_label = |v: &f64| slot_label(&labels, (n as f64 - 1.0) - *v);
        let col_label = |v: &f64| slot_label(&labels, *v);

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&col_label)
            .y_label_formatter(&row_label)
            .label_style(("sans-serif", 14))
            .draw()?;

        let cells: Vec<(usize, usize, Option<f64>)> = (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .map(|(row, col)| (row, col, matrix.get(row, col)))
            .collect();

        chart.draw_series(cells.iter().map(|&(row, col, value)| {
            let (x, y) = cell_centre(n, row, col);
            let fill = value.map_or(MISSING_COLOR, diverging_color);
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill.filled())
        }))?;

        chart.draw_series(cells.iter().map(|&(row, col, value)| {
            let colour = match value {
                Some(v) if v.abs() > 0.6 => WHITE,
                _ => BLACK,
            };
            let style = ("sans-serif", 16)
                .into_font()
                .color(&colour)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(format_stat(value), cell_centre(n, row, col), style)
        }))?;
    }

    root.present()?;
    Ok(())
}
