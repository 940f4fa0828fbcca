//! Terminal-backed display surface.

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use std::io::{self, Write};

use crate::ascii::QuantizedColor;
use crate::renderer::{DisplaySurface, RenderSettings};

/// Display surface that draws glyphs into a terminal.
///
/// Surface pixels map to terminal cells through the configured cell size,
/// so a `cols x rows` terminal is `cols * cell_width` by `rows * cell_height`
/// pixels. Elements that fall outside the visible terminal are tracked but
/// not drawn until a resize brings them on screen. Output is queued and only written on [`present`].
///
/// [`present`]: DisplaySurface::present
pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    settings: RenderSettings,
    /// Every created element, indexed by handle
    elements: Vec<Element>,
}

/// Cell and current content of one text element.
#[derive(Debug, Clone, Copy)]
struct Element {
    col: u16,
    row: u16,
    glyph: char,
    color: QuantizedColor,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, settings: RenderSettings) -> Self {
        Self {
            out,
            cols,
            rows,
            settings,
            elements: Vec::new(),
        }
    }

    /// Track a terminal resize and repaint.
    ///
    /// Existing elements keep their cells. The terminal may have dropped
    /// what was on screen, and elements clipped before may now fit, so the
    /// screen is cleared and every element is drawn again.
    pub fn resize(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.cols = cols;
        self.rows = rows;
        self.repaint()
    }

    /// Clear the screen and redraw every element inside the bounds.
    pub fn repaint(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        for i in 0..self.elements.len() {
            let el = self.elements[i];
            self.draw_at(el.col, el.row, el.glyph, el.color)?;
        }
        self.present()
    }

    /// Terminal size in cells.
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Number of elements created.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Terminal cell of an element.
    pub fn element_cell(&self, handle: usize) -> Option<(u16, u16)> {
        self.elements.get(handle).map(|el| (el.col, el.row))
    }

    /// Consume the surface, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_at(&mut self, col: u16, row: u16, glyph: char, color: QuantizedColor) -> io::Result<()> {
        if col >= self.cols || row >= self.rows {
            return Ok(());
        }
        queue!(
            self.out,
            MoveTo(col, row),
            SetForegroundColor(Color::Rgb {
                r: color.r,
                g: color.g,
                b: color.b,
            }),
            Print(glyph)
        )
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    type Handle = usize;

    fn drawable_size(&self) -> (u32, u32) {
        (
            self.cols as u32 * self.settings.cell_width as u32,
            self.rows as u32 * self.settings.cell_height as u32,
        )
    }

    fn create_text(
        &mut self,
        x: u32,
        y: u32,
        glyph: char,
        color: QuantizedColor,
    ) -> io::Result<usize> {
        let col = (x / self.settings.cell_width.max(1) as u32).min(u16::MAX as u32) as u16;
        let row = (y / self.settings.cell_height.max(1) as u32).min(u16::MAX as u32) as u16;
        self.elements.push(Element {
            col,
            row,
            glyph,
            color,
        });
        self.draw_at(col, row, glyph, color)?;
        Ok(self.elements.len() - 1)
    }

    fn update_text(&mut self, handle: usize, glyph: char, color: QuantizedColor) -> io::Result<()> {
        let el = self.elements.get_mut(handle).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown display handle {}", handle),
            )
        })?;
        el.glyph = glyph;
        el.color = color;
        let (col, row) = (el.col, el.row);
        self.draw_at(col, row, glyph, color)
    }

    fn present(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}
