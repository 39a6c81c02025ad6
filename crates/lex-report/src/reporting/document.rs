//! Paginated A4 document writer.
//!
//! A thin flow layout over `printpdf`: content is appended top to bottom and
//! a new page starts whenever the next block does not fit above the bottom
//! margin. All positions are in points, converted to millimetres at draw time.

use crate::error::{ReportError, Result};
use crate::utils::truncate_label;
use printpdf::image_crate::ImageDecoder;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

// A4 in points
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

const MARGIN_LEFT: f32 = 72.0;
const MARGIN_RIGHT: f32 = 72.0;
const MARGIN_TOP: f32 = 72.0;
const MARGIN_BOTTOM: f32 = 18.0;

const TITLE_SIZE: f32 = 18.0;
const TITLE_SPACE_AFTER: f32 = 30.0;
const HEADING_SIZE: f32 = 14.0;
const HEADING_SPACE_AFTER: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 12.0;
const BODY_SPACE_AFTER: f32 = 6.0;

const TABLE_HEADER_SIZE: f32 = 10.0;
const TABLE_BODY_SIZE: f32 = 8.0;
const TABLE_HEADER_HEIGHT: f32 = 24.0;
const TABLE_ROW_HEIGHT: f32 = 14.0;
const TABLE_CELL_PADDING: f32 = 6.0;
const TABLE_MIN_COLUMN: f32 = 40.0;
const TABLE_LABEL_CHARS: usize = 20;

const IMAGE_DPI: f32 = 300.0;
const POINTS_PER_INCH: f32 = 72.0;

/// RGB triple with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rgb3(pub f32, pub f32, pub f32);

impl Rgb3 {
    pub const BLACK: Rgb3 = Rgb3(0.0, 0.0, 0.0);
    pub const DARK_BLUE: Rgb3 = Rgb3(0.0, 0.0, 0.545);
    pub const GREY: Rgb3 = Rgb3(0.5, 0.5, 0.5);
    pub const WHITE_SMOKE: Rgb3 = Rgb3(0.96, 0.96, 0.96);
    pub const BEIGE: Rgb3 = Rgb3(0.96, 0.96, 0.86);

    fn color(self) -> Color {
        Color::Rgb(Rgb::new(self.0, self.1, self.2, None))
    }
}

/// Helvetica advance widths (1/1000 em) for printable ASCII, starting at space.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Approximate rendered width of `text` in points.
///
/// Bold glyphs are a little wider than regular ones; the estimate pads for that.
pub(crate) fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..127).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                556
            }
        })
        .sum();
    let factor = if bold { 1.06 } else { 1.0 };
    units as f32 / 1000.0 * size * factor
}

/// Greedy word wrap to `max_width` points. Words longer than a line stay whole.
pub(crate) fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, size, false) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / POINTS_PER_INCH)
}

fn printpdf_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::ReportGenerationFailed(err.to_string())
}

/// Flowing document under construction.
pub(crate) struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Top edge of the free space on the current page, measured from the bottom.
    cursor: f32,
    pages: usize,
}

impl PdfWriter {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Page 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(printpdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(printpdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN_TOP,
            pages: 1,
        })
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            mm(PAGE_WIDTH),
            mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN_TOP;
    }

    /// Start a new page unless `height` points still fit on this one.
    fn ensure_space(&mut self, height: f32) {
        let at_top = (self.cursor - (PAGE_HEIGHT - MARGIN_TOP)).abs() < f32::EPSILON;
        if self.cursor - height < MARGIN_BOTTOM && !at_top {
            self.new_page();
        }
    }

    fn draw_text(&self, text: &str, size: f32, x: f32, baseline: f32, bold: bool, color: Rgb3) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color.color());
        self.layer.use_text(text, size, mm(x), mm(baseline), font);
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: Rgb3) {
        self.layer.set_fill_color(color.color());
        self.layer.add_polygon(rect_polygon(x, y, width, height, PaintMode::Fill));
    }

    fn stroke_rect(&self, x: f32, y: f32, width: f32, height: f32) {
        self.layer.set_outline_color(Rgb3::BLACK.color());
        self.layer.set_outline_thickness(1.0);
        self.layer.add_polygon(rect_polygon(x, y, width, height, PaintMode::Stroke));
    }

    /// Centred dark-blue title.
    pub fn title(&mut self, text: &str) {
        let height = TITLE_SIZE * 1.2;
        self.ensure_space(height);
        let width = text_width(text, TITLE_SIZE, true);
        let x = MARGIN_LEFT + ((Self::content_width() - width) / 2.0).max(0.0);
        self.draw_text(text, TITLE_SIZE, x, self.cursor - TITLE_SIZE, true, Rgb3::DARK_BLUE);
        self.cursor -= height + TITLE_SPACE_AFTER;
    }

    /// Dark-blue section heading.
    pub fn heading(&mut self, text: &str) {
        let height = HEADING_SIZE * 1.2;
        // Keep at least one body line under the heading
        self.ensure_space(height + HEADING_SPACE_AFTER + BODY_LEADING);
        self.draw_text(
            text,
            HEADING_SIZE,
            MARGIN_LEFT,
            self.cursor - HEADING_SIZE,
            true,
            Rgb3::DARK_BLUE,
        );
        self.cursor -= height + HEADING_SPACE_AFTER;
    }

    /// Body paragraph wrapped to the printable width.
    pub fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, BODY_SIZE, Self::content_width()) {
            self.body_line(&line, MARGIN_LEFT, false);
        }
        self.cursor -= BODY_SPACE_AFTER;
    }

    /// A bold label followed by a wrapped regular value, e.g. "Data Shape: 3 rows".
    pub fn field(&mut self, label: &str, value: &str) {
        let label = format!("{} ", label);
        let label_width = text_width(&label, BODY_SIZE, true);
        self.ensure_space(BODY_LEADING);
        self.draw_text(
            &label,
            BODY_SIZE,
            MARGIN_LEFT,
            self.cursor - BODY_SIZE,
            true,
            Rgb3::BLACK,
        );

        let first_width = Self::content_width() - label_width;
        let mut lines = wrap_text(value, BODY_SIZE, first_width).into_iter();
        match lines.next() {
            Some(first) => self.body_line(&first, MARGIN_LEFT + label_width, true),
            None => self.cursor -= BODY_LEADING,
        }
        let rest: Vec<String> = lines.collect();
        if !rest.is_empty() {
            for line in wrap_text(&rest.join(" "), BODY_SIZE, Self::content_width()) {
                self.body_line(&line, MARGIN_LEFT, false);
            }
        }
    }

    /// One line of body text; `placed` means space was already reserved.
    fn body_line(&mut self, line: &str, x: f32, placed: bool) {
        if !placed {
            self.ensure_space(BODY_LEADING);
        }
        self.draw_text(line, BODY_SIZE, x, self.cursor - BODY_SIZE, false, Rgb3::BLACK);
        self.cursor -= BODY_LEADING;
    }

    /// A bold line of body text.
    pub fn bold_line(&mut self, text: &str) {
        self.ensure_space(BODY_LEADING);
        self.draw_text(text, BODY_SIZE, MARGIN_LEFT, self.cursor - BODY_SIZE, true, Rgb3::BLACK);
        self.cursor -= BODY_LEADING;
    }

    pub fn spacer(&mut self, height: f32) {
        self.cursor -= height;
    }

    /// Grid with a grey header row and beige body rows.
    ///
    /// Column groups that do not fit the printable width become separate
    /// grids that repeat the first column; rows that overflow a page continue
    /// on the next one under a repeated header row.
    pub fn table(&mut self, header: &[String], rows: &[Vec<String>]) {
        if header.is_empty() {
            return;
        }

        let header: Vec<String> = header
            .iter()
            .map(|h| truncate_label(h, TABLE_LABEL_CHARS))
            .collect();
        let widths: Vec<f32> = (0..header.len())
            .map(|col| {
                let body = rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| text_width(cell, TABLE_BODY_SIZE, false))
                    .fold(0.0f32, f32::max);
                let head = text_width(&header[col], TABLE_HEADER_SIZE, true);
                (body.max(head) + 2.0 * TABLE_CELL_PADDING).max(TABLE_MIN_COLUMN)
            })
            .collect();

        for group in column_groups(&widths, Self::content_width()) {
            self.table_group(&header, rows, &widths, &group);
            self.spacer(12.0);
        }
    }

    fn table_group(
        &mut self,
        header: &[String],
        rows: &[Vec<String>],
        widths: &[f32],
        cols: &[usize],
    ) {
        let total: f32 = cols.iter().map(|&c| widths[c]).sum();
        let left = MARGIN_LEFT + ((Self::content_width() - total) / 2.0).max(0.0);

        self.ensure_space(TABLE_HEADER_HEIGHT + TABLE_ROW_HEIGHT);
        self.table_header(header, widths, cols, left);

        for row in rows {
            if self.cursor - TABLE_ROW_HEIGHT < MARGIN_BOTTOM {
                self.new_page();
                self.table_header(header, widths, cols, left);
            }
            let bottom = self.cursor - TABLE_ROW_HEIGHT;
            let mut x = left;
            for &col in cols {
                let width = widths[col];
                let text = row.get(col).map(String::as_str).unwrap_or("");
                self.fill_rect(x, bottom, width, TABLE_ROW_HEIGHT, Rgb3::BEIGE);
                self.stroke_rect(x, bottom, width, TABLE_ROW_HEIGHT);
                let text_x = x + (width - text_width(text, TABLE_BODY_SIZE, false)) / 2.0;
                self.draw_text(text, TABLE_BODY_SIZE, text_x, bottom + 4.0, false, Rgb3::BLACK);
                x += width;
            }
            self.cursor = bottom;
        }
    }

    fn table_header(&mut self, header: &[String], widths: &[f32], cols: &[usize], left: f32) {
        let bottom = self.cursor - TABLE_HEADER_HEIGHT;
        let mut x = left;
        for &col in cols {
            let width = widths[col];
            let text = header[col].as_str();
            self.fill_rect(x, bottom, width, TABLE_HEADER_HEIGHT, Rgb3::GREY);
            self.stroke_rect(x, bottom, width, TABLE_HEADER_HEIGHT);
            let text_x = x + (width - text_width(text, TABLE_HEADER_SIZE, true)) / 2.0;
            // Extra space below the header text
            self.draw_text(text, TABLE_HEADER_SIZE, text_x, bottom + 12.0, true, Rgb3::WHITE_SMOKE);
            x += width;
        }
        self.cursor = bottom;
    }

    /// Place a PNG at `width_in` x `height_in` inches, centred.
    ///
    /// Returns `Ok(false)` without drawing when the file does not exist.
    pub fn image(&mut self, path: &Path, width_in: f32, height_in: f32) -> Result<bool> {
        if !path.is_file() {
            debug!("Skipping missing image {}", path.display());
            return Ok(false);
        }

        let reader = BufReader::new(File::open(path)?);
        let decoder = PngDecoder::new(reader).map_err(printpdf_error)?;
        let (px_width, px_height) = decoder.dimensions();
        let image = Image::try_from(decoder).map_err(printpdf_error)?;

        let width = width_in * POINTS_PER_INCH;
        let height = height_in * POINTS_PER_INCH;
        self.ensure_space(height);

        let x = MARGIN_LEFT + ((Self::content_width() - width) / 2.0).max(0.0);
        let y = self.cursor - height;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y)),
                scale_x: Some(width_in * IMAGE_DPI / px_width.max(1) as f32),
                scale_y: Some(height_in * IMAGE_DPI / px_height.max(1) as f32),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );

        self.cursor = y;
        Ok(true)
    }

    /// Write the document to `path`, consuming the writer.
    pub fn save(self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.doc.save(&mut writer).map_err(printpdf_error)?;
        debug!("Wrote {} page(s) to {}", self.pages, path.display());
        Ok(())
    }
}

fn rect_polygon(x: f32, y: f32, width: f32, height: f32, mode: PaintMode) -> Polygon {
    let corners = vec![
        (Point::new(mm(x), mm(y)), false),
        (Point::new(mm(x + width), mm(y)), false),
        (Point::new(mm(x + width), mm(y + height)), false),
        (Point::new(mm(x), mm(y + height)), false),
    ];
    Polygon {
        rings: vec![corners],
        mode,
        winding_order: WindingOrder::NonZero,
    }
}

/// Split columns `1..` into groups that fit `max_width` together with column 0.
pub(crate) fn column_groups(widths: &[f32], max_width: f32) -> Vec<Vec<usize>> {
    let Some(&first) = widths.first() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    let mut current = vec![0];
    let mut used = first;

    for (col, &width) in widths.iter().enumerate().skip(1) {
        if used + width > max_width && current.len() > 1 {
            groups.push(std::mem::replace(&mut current, vec![0]));
            used = first;
        }
        current.push(col);
        used += width;
    }
    groups.push(current);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== text measurement tests ====================

    #[test]
    fn test_text_width_uses_glyph_table() {
        // "0" is 556 units wide
        assert!((text_width("00", 10.0, false) - 11.12).abs() < 1e-4);
        assert!(text_width("W", 10.0, false) > text_width("i", 10.0, false));
        assert!(text_width("abc", 10.0, true) > text_width("abc", 10.0, false));
        assert_eq!(text_width("", 10.0, false), 0.0);
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "one two three four five six seven eight nine ten";
        let lines = wrap_text(text, 10.0, 60.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 60.0 || !line.contains(' '));
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_text_keeps_long_words() {
        let lines = wrap_text("supercalifragilistic", 10.0, 20.0);
        assert_eq!(lines, vec!["supercalifragilistic"]);
        assert!(wrap_text("   ", 10.0, 100.0).is_empty());
    }

    // ==================== table layout tests ====================

    #[test]
    fn test_single_group_when_table_fits() {
        let groups = column_groups(&[60.0, 50.0, 50.0], 451.0);
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_wide_table_repeats_first_column() {
        let groups = column_groups(&[60.0, 100.0, 100.0, 100.0], 270.0);
        assert_eq!(groups, vec![vec![0, 1, 2], vec![0, 3]]);
    }

    #[test]
    fn test_oversized_column_still_placed() {
        let groups = column_groups(&[60.0, 500.0, 40.0], 300.0);
        assert_eq!(groups, vec![vec![0, 1], vec![0, 2]]);
    }

    // ==================== document tests ====================

    #[test]
    fn test_long_table_flows_onto_new_pages() {
        let mut writer = PdfWriter::new("t").unwrap();
        let header = vec!["Statistic".to_string(), "value".to_string()];
        let rows: Vec<Vec<String>> = (0..120).map(|i| vec![i.to_string(), "1.00".into()]).collect();

        writer.table(&header, &rows);

        assert!(writer.pages >= 3);
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let mut writer = PdfWriter::new("t").unwrap();
        let placed = writer
            .image(Path::new("does/not/exist.png"), 6.0, 4.0)
            .unwrap();
        assert!(!placed);
        assert_eq!(writer.pages, 1);
    }
}
