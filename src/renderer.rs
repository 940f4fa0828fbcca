//! Diff rendering of glyph grids onto a display surface.
//!
//! The renderer remembers what it last drew at every cell and only touches
//! the surface for cells whose glyph or color changed. Display objects are
//! created the first time a cell becomes visible and reused afterwards.
//! Cells that turn invisible are left alone: whatever was drawn there last
//! stays on screen.

use std::collections::HashMap;
use std::io;

use crate::ascii::{GlyphMap, QuantizedColor};

/// Default cell width in pixels (font advance).
pub const DEFAULT_CELL_WIDTH: u16 = 5;

/// Default cell height in pixels (line height).
pub const DEFAULT_CELL_HEIGHT: u16 = 9;

/// A drawing surface that holds positioned text elements.
///
/// Positions are in surface pixels. Implementations decide what a handle
/// is; the renderer only stores and passes them back.
pub trait DisplaySurface {
    /// Reference to a created text element.
    type Handle: Copy;

    /// Current drawable area as (width, height) in pixels.
    fn drawable_size(&self) -> (u32, u32);

    /// Create a text element at pixel position (x, y).
    fn create_text(
        &mut self,
        x: u32,
        y: u32,
        glyph: char,
        color: QuantizedColor,
    ) -> io::Result<Self::Handle>;

    /// Change the glyph and color of an existing element.
    fn update_text(&mut self, handle: Self::Handle, glyph: char, color: QuantizedColor)
        -> io::Result<()>;

    /// Make pending changes visible.
    fn present(&mut self) -> io::Result<()>;
}

/// Pixel size of one glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub cell_width: u16,
    pub cell_height: u16,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
        }
    }
}

/// What was last drawn at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub glyph: char,
    pub color: QuantizedColor,
}

/// Surface operations performed by one [`DiffRenderer::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// New text elements created
    pub created: usize,
    /// Existing elements changed
    pub updated: usize,
    /// Visible cells identical to the previous draw
    pub unchanged: usize,
}

impl RenderStats {
    /// Number of surface writes.
    pub fn changed(&self) -> usize {
        self.created + self.updated
    }
}

/// Renders glyph grids, touching only cells that changed.
#[derive(Debug)]
pub struct DiffRenderer<H> {
    settings: RenderSettings,
    last: HashMap<(u16, u16), CellState>,
    handles: HashMap<(u16, u16), H>,
}

impl<H: Copy> Default for DiffRenderer<H> {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl<H: Copy> DiffRenderer<H> {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            last: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    /// Last state drawn at (x, y), if the cell was ever visible.
    pub fn cell(&self, x: u16, y: u16) -> Option<&CellState> {
        self.last.get(&(x, y))
    }

    /// Number of display elements created so far.
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Offset that centres a `cols x rows` grid in the surface, clamped at 0.
    pub fn margin(&self, drawable: (u32, u32), cols: u16, rows: u16) -> (u32, u32) {
        let grid_w = cols as u32 * self.settings.cell_width as u32;
        let grid_h = rows as u32 * self.settings.cell_height as u32;
        (
            drawable.0.saturating_sub(grid_w) / 2,
            drawable.1.saturating_sub(grid_h) / 2,
        )
    }

    /// Draw the changed cells of `map` onto `surface`.
    ///
    /// The surface is presented once at the end if anything was written.
    /// On a surface error the cells drawn so far keep their recorded state
    /// and the error is returned.
    pub fn render<S>(&mut self, surface: &mut S, map: &GlyphMap) -> io::Result<RenderStats>
    where
        S: DisplaySurface<Handle = H>,
    {
        let (margin_x, margin_y) = self.margin(surface.drawable_size(), map.width, map.height);
        let mut stats = RenderStats::default();

        for cell in &map.cells {
            let pos = (cell.x, cell.y);
            let state = CellState {
                glyph: cell.glyph,
                color: cell.color,
            };

            if self.last.get(&pos) == Some(&state) {
                stats.unchanged += 1;
                continue;
            }

            match self.handles.get(&pos) {
                Some(&handle) => {
                    surface.update_text(handle, state.glyph, state.color)?;
                    stats.updated += 1;
                }
                None => {
                    let x = margin_x + cell.x as u32 * self.settings.cell_width as u32;
                    let y = margin_y + cell.y as u32 * self.settings.cell_height as u32;
                    let handle = surface.create_text(x, y, state.glyph, state.color)?;
                    self.handles.insert(pos, handle);
                    stats.created += 1;
                }
            }

            self.last.insert(pos, state);
        }

        if stats.changed() > 0 {
            surface.present()?;
        }

        Ok(stats)
    }
}
