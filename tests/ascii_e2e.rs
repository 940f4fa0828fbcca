//! End-to-end pipeline scenarios: raw frame through transform, mapping and
//! diff rendering onto an in-memory surface.

use ascii_cam::ascii::{transform, FrameTransform, PipelineSettings, QuantizedColor};
use ascii_cam::camera::{Frame, FrameFormat};
use ascii_cam::event_loop::{RenderTask, TickOutcome};
use ascii_cam::renderer::{DiffRenderer, DisplaySurface, RenderSettings};
use std::io;
use std::time::Duration;

/// Surface that keeps every element and counts calls.
#[derive(Default)]
struct MemorySurface {
    elements: Vec<(char, QuantizedColor)>,
    creates: usize,
    updates: usize,
}

impl DisplaySurface for MemorySurface {
    type Handle = usize;

    fn drawable_size(&self) -> (u32, u32) {
        (1920, 1080)
    }

    fn create_text(&mut self, _x: u32, _y: u32, glyph: char, color: QuantizedColor) -> io::Result<usize> {
        self.elements.push((glyph, color));
        self.creates += 1;
        Ok(self.elements.len() - 1)
    }

    fn update_text(&mut self, handle: usize, glyph: char, color: QuantizedColor) -> io::Result<()> {
        self.elements[handle] = (glyph, color);
        self.updates += 1;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn gray(width: u32, height: u32, level: u8) -> Frame {
    Frame::solid(width, height, FrameFormat::Bgr, (level, level, level))
}

#[test]
fn test_mid_gray_frame_renders_uniform_grid() {
    let frame = gray(640, 480, 128);
    let (processed, brightness) = transform(&frame, &PipelineSettings::default());

    assert_eq!((processed.width, processed.height), (150, 62));
    assert_eq!(brightness.dimensions(), (150, 62));
    // 128 after gamma 1.3 is 150 everywhere; a flat image has no edges
    assert!(brightness.data.iter().all(|&b| b == 150));

    let mut task = RenderTask::new(PipelineSettings::default(), RenderSettings::default());
    let mut surface = MemorySurface::default();

    let first = task.tick(Some(frame.clone()), &mut surface).unwrap();
    match first {
        TickOutcome::Rendered(stats) => {
            assert_eq!(stats.created, 9300);
            assert_eq!(stats.updated, 0);
        }
        other => panic!("expected a render, got {:?}", other),
    }
    assert_eq!(task.renderer().handle_count(), 9300);
    assert!(surface
        .elements
        .iter()
        .all(|&(glyph, color)| glyph == '=' && color.to_hex() == "#808080"));

    let mut second = gray(640, 480, 128);
    second.timestamp = frame.timestamp + Duration::from_millis(33);
    match task.tick(Some(second), &mut surface).unwrap() {
        TickOutcome::Rendered(stats) => {
            assert_eq!(stats.created, 0);
            assert_eq!(stats.updated, 0);
            assert_eq!(stats.unchanged, 9300);
        }
        other => panic!("expected a render, got {:?}", other),
    }
    assert_eq!(surface.creates, 9300);
    assert_eq!(surface.updates, 0);
}

#[test]
fn test_black_frame_draws_nothing() {
    let frame = gray(640, 480, 0);
    let map = FrameTransform::default().glyphs(&frame);
    assert!(map.is_empty());
    assert_eq!((map.width, map.height), (150, 62));

    let mut renderer = DiffRenderer::default();
    let mut surface = MemorySurface::default();
    let stats = renderer.render(&mut surface, &map).unwrap();

    assert_eq!(stats.changed(), 0);
    assert_eq!(renderer.handle_count(), 0);
    assert!(surface.elements.is_empty());
}

#[test]
fn test_cell_going_dark_keeps_previous_glyph() {
    let settings = PipelineSettings {
        width: 4,
        gamma: 1.0,
        ..PipelineSettings::default()
    };
    let mut task = RenderTask::new(settings, RenderSettings::default());
    let mut surface = MemorySurface::default();

    let bright = gray(8, 8, 50);
    task.tick(Some(bright.clone()), &mut surface).unwrap();
    let before = *task.renderer().cell(0, 0).expect("visible at brightness 50");
    let drawn = surface.elements.len();
    assert!(drawn > 0);

    let mut dark = gray(8, 8, 5);
    dark.timestamp = bright.timestamp + Duration::from_millis(33);
    match task.tick(Some(dark), &mut surface).unwrap() {
        TickOutcome::Rendered(stats) => assert_eq!(stats.changed(), 0),
        other => panic!("expected a render, got {:?}", other),
    }

    assert_eq!(task.renderer().cell(0, 0), Some(&before));
    assert_eq!(surface.elements.len(), drawn);
    assert_eq!(surface.elements[0].0, before.glyph);
}

#[test]
fn test_same_timestamp_is_not_reprocessed() {
    let mut task = RenderTask::new(PipelineSettings::default(), RenderSettings::default());
    let mut surface = MemorySurface::default();
    let frame = gray(64, 48, 200);

    assert!(matches!(
        task.tick(Some(frame.clone()), &mut surface).unwrap(),
        TickOutcome::Rendered(_)
    ));
    assert_eq!(task.tick(Some(frame), &mut surface).unwrap(), TickOutcome::Stale);
    assert_eq!(task.tick(None, &mut surface).unwrap(), TickOutcome::NoFrame);
    assert_eq!(task.frames_rendered(), 1);
}

#[test]
fn test_channel_order_does_not_change_output() {
    let mut bgr = Frame::solid(32, 24, FrameFormat::Bgr, (250, 40, 90));
    let rgb = Frame::solid(32, 24, FrameFormat::Rgb, (250, 40, 90));
    bgr.timestamp = rgb.timestamp;

    let t = FrameTransform::default();
    assert_eq!(t.glyphs(&bgr), t.glyphs(&rgb));
}

#[test]
fn test_gradient_uses_several_glyphs() {
    let (w, h) = (320u32, 240u32);
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for _ in 0..h {
        for x in 0..w {
            let v = (x * 255 / (w - 1)) as u8;
            data.extend_from_slice(&[v, v, v]);
        }
    }
    let frame = Frame {
        data,
        width: w,
        height: h,
        format: FrameFormat::Rgb,
        timestamp: std::time::Instant::now(),
    };

    let map = FrameTransform::default().glyphs(&frame);
    let mut glyphs: Vec<char> = map.cells.iter().map(|c| c.glyph).collect();
    glyphs.sort_unstable();
    glyphs.dedup();
    assert!(glyphs.len() >= 5, "only {:?}", glyphs);

    // Left column is dark, right column bright
    assert!(map.get(0, 0).is_none());
    assert_eq!(map.get(149, 0).map(|c| c.glyph), Some(' '));
}
