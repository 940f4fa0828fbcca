//! Unit tests for the diff renderer against a recording surface.

use ascii_cam::ascii::{FrameTransform, GlyphCell, GlyphMap, QuantizedColor};
use ascii_cam::camera::{Frame, FrameFormat};
use ascii_cam::renderer::{DiffRenderer, DisplaySurface, RenderSettings};
use ascii_cam::terminal::TerminalSurface;
use std::collections::HashMap;
use std::io;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Create { x: u32, y: u32, glyph: char },
    Update { handle: usize, glyph: char },
    Present,
}

/// Records every surface call in order.
struct RecordingSurface {
    size: (u32, u32),
    ops: Vec<Op>,
    positions: Vec<(u32, u32)>,
}

impl RecordingSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ops: Vec::new(),
            positions: Vec::new(),
        }
    }

    fn draws(&self) -> usize {
        self.ops.iter().filter(|op| !matches!(op, Op::Present)).count()
    }

    fn presents(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Present)).count()
    }
}

impl DisplaySurface for RecordingSurface {
    type Handle = usize;

    fn drawable_size(&self) -> (u32, u32) {
        self.size
    }

    fn create_text(&mut self, x: u32, y: u32, glyph: char, _color: QuantizedColor) -> io::Result<usize> {
        self.ops.push(Op::Create { x, y, glyph });
        self.positions.push((x, y));
        Ok(self.positions.len() - 1)
    }

    fn update_text(&mut self, handle: usize, glyph: char, _color: QuantizedColor) -> io::Result<()> {
        self.ops.push(Op::Update { handle, glyph });
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.ops.push(Op::Present);
        Ok(())
    }
}

fn grid(width: u16, height: u16, glyph_at: impl Fn(u16, u16) -> Option<char>) -> GlyphMap {
    let mut cells = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if let Some(glyph) = glyph_at(x, y) {
                cells.push(GlyphCell {
                    x,
                    y,
                    glyph,
                    color: QuantizedColor::from_rgb(128, 128, 128),
                });
            }
        }
    }
    GlyphMap {
        width,
        height,
        cells,
    }
}

#[test]
fn test_grid_is_centred_in_drawable_area() {
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let mut surface = RecordingSurface::new(1000, 900);

    // 10x10 cells of 5x9 px = 50x90, margin (475, 405)
    renderer
        .render(&mut surface, &grid(10, 10, |x, y| (x == 0 && y == 0).then_some('@')))
        .unwrap();

    assert_eq!(surface.ops[0], Op::Create { x: 475, y: 405, glyph: '@' });
}

#[test]
fn test_margin_clamped_when_grid_overflows() {
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let mut surface = RecordingSurface::new(100, 100);

    renderer
        .render(&mut surface, &grid(150, 62, |x, y| (x == 2 && y == 1).then_some('#')))
        .unwrap();

    assert_eq!(surface.ops[0], Op::Create { x: 10, y: 9, glyph: '#' });
}

#[test]
fn test_custom_cell_size_positions() {
    let settings = RenderSettings {
        cell_width: 8,
        cell_height: 16,
    };
    let mut renderer = DiffRenderer::new(settings);
    let mut surface = RecordingSurface::new(0, 0);

    renderer
        .render(&mut surface, &grid(3, 3, |x, y| (x == 2 && y == 2).then_some('+')))
        .unwrap();

    assert_eq!(surface.ops[0], Op::Create { x: 16, y: 32, glyph: '+' });
}

#[test]
fn test_at_most_one_draw_per_position_per_render() {
    let transform = FrameTransform::default();
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let mut surface = RecordingSurface::new(1920, 1080);

    for level in [40u8, 120, 200, 120] {
        let frame = Frame::solid(320, 240, FrameFormat::Rgb, (level, level / 2, 255 - level));
        surface.ops.clear();
        renderer.render(&mut surface, &transform.glyphs(&frame)).unwrap();

        let mut touched: HashMap<(u32, u32), usize> = HashMap::new();
        for op in &surface.ops {
            let pos = match *op {
                Op::Create { x, y, .. } => (x, y),
                Op::Update { handle, .. } => surface.positions[handle],
                Op::Present => continue,
            };
            *touched.entry(pos).or_default() += 1;
        }
        assert!(touched.values().all(|&n| n == 1));
        assert!(surface.presents() <= 1);
    }
}

#[test]
fn test_repeated_mapping_produces_no_surface_calls() {
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let mut surface = RecordingSurface::new(800, 600);
    let map = grid(20, 10, |x, y| Some(if (x + y) % 2 == 0 { '@' } else { '.' }));

    let first = renderer.render(&mut surface, &map).unwrap();
    assert_eq!(first.created, 200);
    assert_eq!(surface.presents(), 1);

    surface.ops.clear();
    let second = renderer.render(&mut surface, &map).unwrap();
    assert_eq!(second.changed(), 0);
    assert_eq!(second.unchanged, 200);
    assert!(surface.ops.is_empty());
}

#[test]
fn test_changes_reuse_handles() {
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let mut surface = RecordingSurface::new(800, 600);

    renderer
        .render(&mut surface, &grid(4, 1, |_, _| Some('@')))
        .unwrap();
    surface.ops.clear();
    let stats = renderer
        .render(&mut surface, &grid(4, 1, |x, _| Some(if x == 2 { '-' } else { '@' })))
        .unwrap();

    assert_eq!(stats.created, 0);
    assert_eq!(stats.updated, 1);
    assert_eq!(
        surface.ops,
        vec![Op::Update { handle: 2, glyph: '-' }, Op::Present]
    );
    assert_eq!(renderer.handle_count(), 4);
}

#[test]
fn test_color_change_alone_triggers_update() {
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let mut surface = RecordingSurface::new(800, 600);
    let mut map = grid(1, 1, |_, _| Some('#'));

    renderer.render(&mut surface, &map).unwrap();
    map.cells[0].color = QuantizedColor::from_rgb(255, 0, 0);
    let stats = renderer.render(&mut surface, &map).unwrap();

    assert_eq!(stats.updated, 1);
    assert_eq!(
        renderer.cell(0, 0).map(|c| c.color),
        Some(QuantizedColor::from_rgb(192, 0, 0))
    );
}

#[test]
fn test_terminal_surface_receives_centred_cells() {
    // 40x10 terminal = 200x90 px; 20x4 grid = 100x36 px -> margin (50, 27)
    let mut surface = TerminalSurface::new(Vec::new(), 40, 10, RenderSettings::default());
    let mut renderer = DiffRenderer::new(RenderSettings::default());

    renderer
        .render(&mut surface, &grid(20, 4, |x, y| (x == 0 && y == 0).then_some('@')))
        .unwrap();

    assert_eq!(surface.element_count(), 1);
    assert_eq!(surface.element_cell(0), Some((10, 3)));
}

#[test]
fn test_clipped_cell_appears_after_terminal_grows() {
    // 10x5 terminal = 50x45 px; a 20-wide grid overflows, margin (0, 18)
    let mut surface = TerminalSurface::new(Vec::new(), 10, 5, RenderSettings::default());
    let mut renderer = DiffRenderer::new(RenderSettings::default());
    let map = grid(20, 1, |x, _| (x == 15).then_some('@'));

    renderer.render(&mut surface, &map).unwrap();
    assert_eq!(surface.element_cell(0), Some((15, 2)));

    surface.resize(40, 10).unwrap();
    let stats = renderer.render(&mut surface, &map).unwrap();
    assert_eq!(stats.changed(), 0);

    let out = String::from_utf8(surface.into_inner()).unwrap();
    let after_resize = &out[out.find("\x1b[2J").expect("screen cleared on resize")..];
    // MoveTo is 1-based in the escape sequence
    assert!(after_resize.contains("\x1b[3;16H"));
    assert!(after_resize.contains('@'));
}

#[test]
fn test_resize_repaints_existing_cells_in_place() {
    let mut surface = TerminalSurface::new(Vec::new(), 40, 10, RenderSettings::default());
    let mut renderer = DiffRenderer::new(RenderSettings::default());

    renderer
        .render(&mut surface, &grid(2, 1, |_, _| Some('#')))
        .unwrap();
    let before = (surface.element_cell(0), surface.element_cell(1));

    surface.resize(80, 24).unwrap();
    assert_eq!((surface.element_cell(0), surface.element_cell(1)), before);

    let out = String::from_utf8(surface.into_inner()).unwrap();
    let after_resize = &out[out.find("\x1b[2J").unwrap()..];
    assert_eq!(after_resize.matches('#').count(), 2);
}

#[test]
fn test_cells_created_after_resize_are_centred_in_new_area() {
    // 10x5 terminal = 50x45 px; 4x1 grid = 20x9 px -> margin (15, 18)
    let mut surface = TerminalSurface::new(Vec::new(), 10, 5, RenderSettings::default());
    let mut renderer = DiffRenderer::new(RenderSettings::default());

    renderer
        .render(&mut surface, &grid(4, 1, |x, _| (x == 0).then_some('@')))
        .unwrap();
    assert_eq!(surface.element_cell(0), Some((3, 2)));

    // 40x10 terminal = 200x90 px -> margin (90, 40)
    surface.resize(40, 10).unwrap();
    let stats = renderer
        .render(&mut surface, &grid(4, 1, |x, _| (x <= 1).then_some('@')))
        .unwrap();

    assert_eq!(stats.created, 1);
    assert_eq!(stats.unchanged, 1);
    assert_eq!(surface.element_cell(0), Some((3, 2)));
    assert_eq!(surface.element_cell(1), Some((19, 4)));
}
