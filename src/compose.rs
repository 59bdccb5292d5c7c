use std::io::Write;

use log::debug;

use crate::document::PdfDocument;
use crate::error::{Error, Result};
use crate::fonts::Font;
use crate::writer::{escape_text, format_coord};

/// Conversion factor from millimeters to PDF points.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;
const SIDE_MARGIN_MM: f64 = 10.0;
const TOP_MARGIN_MM: f64 = 10.0;
/// Horizontal padding inside a cell.
const CELL_PADDING_MM: f64 = 1.0;
/// Default bottom margin before an automatic page break fires.
const DEFAULT_BREAK_MARGIN_MM: f64 = 15.0;

/// Horizontal alignment of text within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Cursor-based page composer over [`PdfDocument`].
///
/// Works in millimeters with the origin at the top-left corner of an
/// A4 portrait page, converting to PDF's bottom-left point space only
/// when emitting operators. Text is written through fixed-height
/// cells; when the cursor would cross the bottom break margin, a new
/// page is started automatically and the cell lands there instead.
pub struct Composer<W: Write> {
    doc: PdfDocument<W>,
    page_width: f64,
    page_height: f64,
    margin_left: f64,
    margin_right: f64,
    margin_top: f64,
    x: f64,
    y: f64,
    auto_break: bool,
    /// y beyond which the next cell starts a new page.
    break_trigger: f64,
    font: Font,
    font_size: f64,
    page_open: bool,
}

impl<W: Write> Composer<W> {
    /// Create a composer writing an A4 portrait document to `writer`.
    pub fn new(writer: W) -> Result<Self> {
        Ok(Composer {
            doc: PdfDocument::new(writer)?,
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin_left: SIDE_MARGIN_MM,
            margin_right: SIDE_MARGIN_MM,
            margin_top: TOP_MARGIN_MM,
            x: SIDE_MARGIN_MM,
            y: TOP_MARGIN_MM,
            auto_break: true,
            break_trigger: A4_HEIGHT_MM - DEFAULT_BREAK_MARGIN_MM,
            font: Font::Helvetica,
            font_size: 12.0,
            page_open: false,
        })
    }

    /// Enable or disable compression of page content streams.
    pub fn set_compression(&mut self, on: bool) {
        self.doc.set_compression(on);
    }

    /// Add a document info entry (e.g. "Title").
    pub fn set_info(&mut self, key: &str, value: &str) {
        self.doc.set_info(key, value);
    }

    /// Configure automatic page breaking with the given bottom
    /// margin in millimeters.
    pub fn set_auto_page_break(&mut self, on: bool, bottom_margin_mm: f64) {
        self.auto_break = on;
        self.break_trigger = self.page_height - bottom_margin_mm;
    }

    /// Append a page and reset the cursor to the top-left margins.
    pub fn add_page(&mut self) -> Result<()> {
        self.doc
            .begin_page(self.page_width * MM_TO_PT, self.page_height * MM_TO_PT)?;
        self.x = self.margin_left;
        self.y = self.margin_top;
        self.page_open = true;
        debug!("page {} started", self.doc.page_count());
        Ok(())
    }

    /// Select the font and size (in points) for subsequent cells.
    pub fn set_font(&mut self, font: Font, size_pt: f64) {
        self.font = font;
        self.font_size = size_pt;
    }

    /// Number of pages begun so far.
    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Current vertical cursor position in millimeters from the top.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Write one cell of width `w` and height `h` (millimeters).
    /// `w == 0.0` extends the cell to the right margin. With
    /// `advance` the cursor moves to the start of the next line;
    /// otherwise it moves right past the cell.
    ///
    /// Fires an automatic page break first if the cell would cross
    /// the bottom break margin.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, advance: bool, align: Align) -> Result<()> {
        if !self.page_open {
            return Err(Error::NoOpenPage);
        }

        if self.auto_break && self.y + h > self.break_trigger {
            debug!("page break at y = {:.1} mm", self.y);
            let x = self.x;
            self.add_page()?;
            self.x = x;
        }

        let w = if w <= 0.0 {
            self.page_width - self.margin_right - self.x
        } else {
            w
        };

        if !text.is_empty() {
            let text_w = self.font.text_width(text, self.font_size) / MM_TO_PT;
            let dx = match align {
                Align::Left => CELL_PADDING_MM,
                Align::Center => (w - text_w) / 2.0,
                Align::Right => w - CELL_PADDING_MM - text_w,
            };
            // FPDF baseline placement: vertically centered in the
            // cell, shifted down by 0.3 of the font size.
            let baseline = self.y + 0.5 * h + 0.3 * self.font_size / MM_TO_PT;
            let tx = (self.x + dx) * MM_TO_PT;
            let ty = (self.page_height - baseline) * MM_TO_PT;
            let ops = format!(
                "BT\n/{} {} Tf\n{} {} Td\n({}) Tj\nET\n",
                self.font.resource_name(),
                format_coord(self.font_size),
                format_coord(tx),
                format_coord(ty),
                escape_text(text),
            );
            self.doc.push_ops(ops.as_bytes())?;
        }

        if advance {
            self.y += h;
            self.x = self.margin_left;
        } else {
            self.x += w;
        }
        Ok(())
    }

    /// Write text into a cell of width `w`, wrapping words onto
    /// consecutive lines of height `h`. An empty string still
    /// consumes one line; explicit `\n` forces a break; a word wider
    /// than the cell is broken at character granularity.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str) -> Result<()> {
        if !self.page_open {
            return Err(Error::NoOpenPage);
        }

        let w = if w <= 0.0 {
            self.page_width - self.margin_right - self.x
        } else {
            w
        };
        let max_width_pt = (w - 2.0 * CELL_PADDING_MM) * MM_TO_PT;

        for line in wrap_lines(text, self.font, self.font_size, max_width_pt) {
            self.cell(w, h, &line, true, Align::Left)?;
        }
        Ok(())
    }

    /// Move the cursor down by `h` millimeters and back to the left
    /// margin.
    pub fn line_break(&mut self, h: f64) {
        self.y += h;
        self.x = self.margin_left;
    }

    /// Close the open page and finish the document, returning the
    /// inner writer.
    pub fn finish(self) -> Result<W> {
        self.doc.end_document()
    }
}

/// Split `text` into lines no wider than `max_width_pt` at the given
/// font and size. Breaks at the last space where possible, dropping
/// the separator; a single over-wide word is split between
/// characters.
fn wrap_lines(text: &str, font: Font, size_pt: f64, max_width_pt: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        if segment.is_empty() {
            lines.push(String::new());
            continue;
        }
        let chars: Vec<char> = segment.chars().collect();
        let mut start = 0;
        while start < chars.len() {
            let mut width = 0.0;
            let mut last_space = None;
            let mut split = None;
            let mut i = start;
            while i < chars.len() {
                let ch = chars[i];
                if ch == ' ' {
                    last_space = Some(i);
                }
                width += font.char_width(ch) as f64 * size_pt / 1000.0;
                if width > max_width_pt && i > start {
                    split = Some(match last_space {
                        // Break at the space and skip over it.
                        Some(s) if s > start => (s, s + 1),
                        _ => (i, i),
                    });
                    break;
                }
                i += 1;
            }
            match split {
                Some((end, next)) => {
                    lines.push(chars[start..end].iter().collect());
                    start = next;
                }
                None => {
                    lines.push(chars[start..].iter().collect());
                    break;
                }
            }
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
