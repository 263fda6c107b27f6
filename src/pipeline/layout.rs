//! Document layout: booking info, special requests and course tables laid
//! out as paginated tables with measured row heights.
//!
//! The engine owns geometry and pagination; drawing and wrapped-text
//! measurement go through the [`PageSink`] collaborator, so the concrete
//! rendering target (plain text, PDF) stays out of the layout logic.

use crate::constants::*;
use crate::types::{BookingRecord, BuffetLine, CourseRow, GroupedPreorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Label,
    Body,
}

/// Rendering target for the layout engine. Coordinates are millimetres from
/// the top-left of the current page.
pub trait PageSink {
    /// Starts a fresh page; subsequent draws land on it.
    fn begin_page(&mut self);
    fn line_height(&self, style: TextStyle) -> f32;
    /// Wraps text to the given width, returning the rendered lines.
    fn split_to_width(&self, text: &str, width: f32, style: TextStyle) -> Vec<String>;
    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle);
    fn draw_hline(&mut self, x1: f32, x2: f32, y: f32);
    fn draw_vline(&mut self, x: f32, y1: f32, y2: f32);
}

struct Column {
    label: &'static str,
    width: f32,
}

fn course_columns(with_side: bool) -> Vec<Column> {
    let content = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let side = if with_side { SIDE_COL_WIDTH } else { 0.0 };
    // The item column takes whatever horizontal space the fixed columns leave.
    let item = content - PERSON_COL_WIDTH - NOTES_COL_WIDTH - side;
    let mut columns = vec![
        Column { label: "Person", width: PERSON_COL_WIDTH },
        Column { label: "Item", width: item },
    ];
    if with_side {
        columns.push(Column { label: "Side", width: SIDE_COL_WIDTH });
    }
    columns.push(Column { label: "Notes", width: NOTES_COL_WIDTH });
    columns
}

pub struct DocumentLayoutEngine<'a> {
    sink: &'a mut dyn PageSink,
    cursor: f32,
}

impl<'a> DocumentLayoutEngine<'a> {
    pub fn new(sink: &'a mut dyn PageSink) -> Self {
        sink.begin_page();
        Self { sink, cursor: PAGE_MARGIN }
    }

    /// Renders the full document: booking info first, special requests when
    /// present, then one table per non-empty course group in fixed order.
    pub fn render(&mut self, booking: &BookingRecord, grouped: Option<&GroupedPreorder>) {
        self.write_line("Preorder Summary", TextStyle::Title);
        self.cursor += 2.0;
        self.render_booking_info(booking);
        self.render_special_requests(booking);

        match grouped {
            Some(GroupedPreorder::Courses(groups)) => {
                let tables: [(&str, &Vec<CourseRow>, bool); 3] = [
                    ("Starters", &groups.starters, false),
                    ("Mains", &groups.mains, true),
                    ("Desserts", &groups.desserts, false),
                ];
                for (title, rows, with_side) in tables {
                    if !rows.is_empty() {
                        self.render_course_table(title, rows, with_side);
                    }
                }
            }
            Some(GroupedPreorder::Buffet(lines)) => {
                if !lines.is_empty() {
                    self.render_buffet_table(lines);
                }
            }
            None => {}
        }
    }

    fn render_booking_info(&mut self, booking: &BookingRecord) {
        let lines = [
            format!("Date: {}", display_or_na(&booking.date)),
            format!("Time: {}", display_or_na(&booking.time)),
            format!("Party size: {}", booking.party_size),
            format!("Name: {}", booking.full_name()),
            format!("Email: {}", display_or_na(&booking.email)),
            format!("Phone: {}", display_or_na(&booking.phone)),
        ];
        for line in &lines {
            self.write_paragraph(line, TextStyle::Body);
        }
        self.cursor += 4.0;
    }

    fn render_special_requests(&mut self, booking: &BookingRecord) {
        let requests = booking.special_requests.trim();
        if requests.is_empty() {
            return;
        }
        self.write_line("Special requests", TextStyle::Label);
        self.write_paragraph(requests, TextStyle::Body);
        self.cursor += 4.0;
    }

    fn render_course_table(&mut self, title: &str, rows: &[CourseRow], with_side: bool) {
        let columns = course_columns(with_side);
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.person.clone(), row.item.clone()];
                if with_side {
                    cells.push(row.side.clone());
                }
                cells.push(row.notes.clone());
                cells
            })
            .collect();
        self.render_table(title, &columns, &body);
    }

    fn render_buffet_table(&mut self, lines: &[BuffetLine]) {
        let content = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
        let columns = vec![
            Column { label: "Item", width: content - QUANTITY_COL_WIDTH },
            Column { label: "Qty", width: QUANTITY_COL_WIDTH },
        ];
        let body: Vec<Vec<String>> = lines
            .iter()
            .map(|line| vec![line.item.clone(), line.quantity.to_string()])
            .collect();
        self.render_table("Buffet Selections", &columns, &body);
    }

    /// Lays out one table. The page-break decision uses the precomputed
    /// total height and happens once, before anything is drawn; a table that
    /// still cannot fit one page continues onto subsequent pages, with the
    /// column header re-emitted at the top of every continuation.
    fn render_table(&mut self, title: &str, columns: &[Column], rows: &[Vec<String>]) {
        let heights: Vec<f32> = rows
            .iter()
            .map(|row| self.row_height(columns, row))
            .collect();
        let total = TABLE_TITLE_HEIGHT + HEADER_ROW_HEIGHT + heights.iter().sum::<f32>();
        let page_bottom = PAGE_HEIGHT - PAGE_MARGIN;

        if self.cursor + total > page_bottom {
            self.sink.begin_page();
            self.cursor = PAGE_MARGIN;
        }

        self.sink.draw_text(PAGE_MARGIN, self.cursor, title, TextStyle::Label);
        self.cursor += TABLE_TITLE_HEIGHT;

        let table_right = PAGE_MARGIN + columns.iter().map(|c| c.width).sum::<f32>();

        let mut index = 0;
        loop {
            // One segment per page: header, then as many rows as fit.
            let segment_top = self.cursor;
            let start = index;
            let mut segment_bottom = segment_top + HEADER_ROW_HEIGHT;
            while index < rows.len() {
                let height = heights[index];
                // A row taller than a whole page is drawn anyway; each
                // segment takes at least one row so drawing always advances.
                if segment_bottom + height > page_bottom && index > start {
                    break;
                }
                segment_bottom += height;
                index += 1;
            }

            self.draw_segment(columns, &rows[start..index], &heights[start..index], segment_top, table_right);
            self.cursor = segment_bottom;

            if index >= rows.len() {
                break;
            }
            self.sink.begin_page();
            self.cursor = PAGE_MARGIN;
        }

        self.cursor += TABLE_GAP;
    }

    /// Draws one page-worth of a table: header labels, grid lines over the
    /// segment extent, then each row's cell text centered in its band.
    fn draw_segment(
        &mut self,
        columns: &[Column],
        rows: &[Vec<String>],
        heights: &[f32],
        top: f32,
        right: f32,
    ) {
        let bottom = top + HEADER_ROW_HEIGHT + heights.iter().sum::<f32>();

        // Header labels.
        let mut x = PAGE_MARGIN;
        for column in columns {
            self.draw_cell(x, top, HEADER_ROW_HEIGHT, column.label, column.width, TextStyle::Label);
            x += column.width;
        }

        // Grid lines spanning the full segment extent.
        self.sink.draw_hline(PAGE_MARGIN, right, top);
        let mut y = top + HEADER_ROW_HEIGHT;
        self.sink.draw_hline(PAGE_MARGIN, right, y);
        for height in heights {
            y += height;
            self.sink.draw_hline(PAGE_MARGIN, right, y);
        }
        let mut x = PAGE_MARGIN;
        self.sink.draw_vline(x, top, bottom);
        for column in columns {
            x += column.width;
            self.sink.draw_vline(x, top, bottom);
        }

        // Row text, vertically centered within each row band.
        let mut band_top = top + HEADER_ROW_HEIGHT;
        for (row, height) in rows.iter().zip(heights) {
            let mut x = PAGE_MARGIN;
            for (column, cell) in columns.iter().zip(row) {
                self.draw_cell(x, band_top, *height, cell, column.width, TextStyle::Body);
                x += column.width;
            }
            band_top += height;
        }
    }

    /// Row height is the tallest wrapped cell, floored at the minimum.
    fn row_height(&self, columns: &[Column], row: &[String]) -> f32 {
        let line_height = self.sink.line_height(TextStyle::Body);
        let mut height = MIN_ROW_HEIGHT;
        for (column, cell) in columns.iter().zip(row) {
            if cell.is_empty() {
                continue;
            }
            let lines = self
                .sink
                .split_to_width(cell, column.width - 2.0 * CELL_PADDING, TextStyle::Body);
            height = height.max(lines.len() as f32 * line_height + 2.0 * CELL_PADDING);
        }
        height
    }

    fn draw_cell(
        &mut self,
        column_x: f32,
        band_top: f32,
        band_height: f32,
        text: &str,
        width: f32,
        style: TextStyle,
    ) {
        if text.is_empty() {
            return;
        }
        let line_height = self.sink.line_height(style);
        let lines = self.sink.split_to_width(text, width - 2.0 * CELL_PADDING, style);
        let block_height = lines.len() as f32 * line_height;
        let mut y = band_top + (band_height - block_height).max(0.0) / 2.0;
        for line in &lines {
            self.sink.draw_text(column_x + CELL_PADDING, y, line, style);
            y += line_height;
        }
    }

    fn write_line(&mut self, text: &str, style: TextStyle) {
        let line_height = self.sink.line_height(style);
        self.ensure_space(line_height);
        self.sink.draw_text(PAGE_MARGIN, self.cursor, text, style);
        self.cursor += line_height;
    }

    fn write_paragraph(&mut self, text: &str, style: TextStyle) {
        let width = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
        let lines = self.sink.split_to_width(text, width, style);
        for line in &lines {
            let line_height = self.sink.line_height(style);
            self.ensure_space(line_height);
            self.sink.draw_text(PAGE_MARGIN, self.cursor, line, style);
            self.cursor += line_height;
        }
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.cursor + needed > PAGE_HEIGHT - PAGE_MARGIN {
            self.sink.begin_page();
            self.cursor = PAGE_MARGIN;
        }
    }
}

fn display_or_na(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { "N/A" } else { trimmed }
}
