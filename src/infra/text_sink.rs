//! Plain-text page sink: renders layout output onto a fixed character grid
//! per page, producing a deterministic printable artifact.
//!
//! Millimetre coordinates map onto the grid at 2mm per character column and
//! 5mm per text row. Grid lines never overwrite text already drawn; text
//! drawn later wins over grid lines.

use crate::constants::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::pipeline::layout::{PageSink, TextStyle};
use crate::types::DocumentArtifact;

const CHAR_WIDTH_MM: f32 = 2.0;
const LINE_HEIGHT_MM: f32 = 5.0;

fn grid_cols() -> usize {
    (PAGE_WIDTH / CHAR_WIDTH_MM) as usize
}

fn grid_rows() -> usize {
    (PAGE_HEIGHT / LINE_HEIGHT_MM).ceil() as usize
}

pub struct TextPageSink {
    pages: Vec<Vec<Vec<char>>>,
}

impl TextPageSink {
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Produces the document artifact. Pages are separated by a form feed;
    /// trailing whitespace per line is trimmed.
    pub fn finish(self) -> DocumentArtifact {
        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                out.push_str("\u{c}\n");
            }
            for row in page {
                let line: String = row.iter().collect();
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        DocumentArtifact {
            filename: "preorder-summary.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: out.into_bytes(),
        }
    }

    fn put_text(&mut self, row: usize, col: usize, ch: char) {
        if let Some(page) = self.pages.last_mut() {
            if row < page.len() && col < page[row].len() {
                page[row][col] = ch;
            }
        }
    }

    /// Grid strokes yield to text and join with crossing strokes.
    fn put_stroke(&mut self, row: usize, col: usize, ch: char) {
        if let Some(page) = self.pages.last_mut() {
            if row < page.len() && col < page[row].len() {
                let existing = page[row][col];
                page[row][col] = match (existing, ch) {
                    (' ', _) => ch,
                    ('-', '|') | ('|', '-') | ('+', _) => '+',
                    _ => existing,
                };
            }
        }
    }

    fn row_index(y: f32) -> usize {
        (y / LINE_HEIGHT_MM).round().max(0.0) as usize
    }

    fn col_index(x: f32) -> usize {
        (x / CHAR_WIDTH_MM).round().max(0.0) as usize
    }
}

impl Default for TextPageSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSink for TextPageSink {
    fn begin_page(&mut self) {
        self.pages.push(vec![vec![' '; grid_cols()]; grid_rows()]);
    }

    fn line_height(&self, _style: TextStyle) -> f32 {
        LINE_HEIGHT_MM
    }

    fn split_to_width(&self, text: &str, width: f32, _style: TextStyle) -> Vec<String> {
        let max_chars = ((width / CHAR_WIDTH_MM) as usize).max(1);
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        let mut flush = |current: &mut String, lines: &mut Vec<String>| {
            if !current.is_empty() {
                lines.push(std::mem::take(current));
            }
        };

        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if !current.is_empty() && current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                continue;
            }
            flush(&mut current, &mut lines);
            if word_len <= max_chars {
                current = word.to_string();
            } else {
                // Hard-break words longer than the column.
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(max_chars) {
                    lines.push(chunk.iter().collect());
                }
                current = lines.pop().unwrap_or_default();
            }
        }
        flush(&mut current, &mut lines);
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, _style: TextStyle) {
        let row = Self::row_index(y);
        let col = Self::col_index(x);
        for (offset, ch) in text.chars().enumerate() {
            self.put_text(row, col + offset, ch);
        }
    }

    fn draw_hline(&mut self, x1: f32, x2: f32, y: f32) {
        let row = Self::row_index(y);
        let (start, end) = (Self::col_index(x1), Self::col_index(x2));
        for col in start..=end {
            self.put_stroke(row, col, '-');
        }
    }

    fn draw_vline(&mut self, x: f32, y1: f32, y2: f32) {
        let col = Self::col_index(x);
        let (start, end) = (Self::row_index(y1), Self::row_index(y2));
        for row in start..=end {
            self.put_stroke(row, col, '|');
        }
    }
}
