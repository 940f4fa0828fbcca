//! Render scheduling: one pipeline pass per tick, driven by an async loop.
//!
//! [`RenderTask::tick`] is a single activation: take the latest frame (if
//! any), transform it, map it to glyphs and diff-render it. [`run`] keeps
//! activating it at the configured interval on a single thread, alongside
//! terminal input, until a quit key or a termination signal arrives.

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::ascii::{FrameTransform, PipelineSettings};
use crate::camera::{Frame, FrameSource};
use crate::error::AppError;
use crate::input::{handle_key_event, KeyAction};
use crate::renderer::{DiffRenderer, DisplaySurface, RenderSettings, RenderStats};
use crate::terminal::TerminalSurface;

/// Result of one render activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing captured yet; try again next tick
    NoFrame,
    /// The latest frame was already rendered
    Stale,
    /// A new frame went through the pipeline
    Rendered(RenderStats),
}

/// Transform + mapping + diff render for successive frames.
#[derive(Debug)]
pub struct RenderTask<H> {
    transform: FrameTransform,
    renderer: DiffRenderer<H>,
    last_timestamp: Option<Instant>,
    frames_rendered: u64,
}

impl<H: Copy> RenderTask<H> {
    pub fn new(pipeline: PipelineSettings, render: RenderSettings) -> Self {
        Self {
            transform: FrameTransform::new(pipeline),
            renderer: DiffRenderer::new(render),
            last_timestamp: None,
            frames_rendered: 0,
        }
    }

    pub fn renderer(&self) -> &DiffRenderer<H> {
        &self.renderer
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Whether the frame captured at `timestamp` was the last one rendered.
    pub fn has_rendered(&self, timestamp: Instant) -> bool {
        self.last_timestamp == Some(timestamp)
    }

    /// Run one pipeline pass on `frame`.
    ///
    /// A frame with the same capture timestamp as the previous one is not
    /// processed again; it would diff to zero changes anyway.
    pub fn tick<S>(&mut self, frame: Option<Frame>, surface: &mut S) -> io::Result<TickOutcome>
    where
        S: DisplaySurface<Handle = H>,
    {
        let Some(frame) = frame else {
            return Ok(TickOutcome::NoFrame);
        };
        if self.has_rendered(frame.timestamp) {
            return Ok(TickOutcome::Stale);
        }

        let glyphs = self.transform.glyphs(&frame);
        let stats = self.renderer.render(surface, &glyphs)?;

        self.last_timestamp = Some(frame.timestamp);
        self.frames_rendered += 1;
        Ok(TickOutcome::Rendered(stats))
    }
}

/// Global flag set by the signal handler.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if SIGINT/SIGTERM has been received.
pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

/// Set up the SIGINT/SIGTERM handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
    })
}

/// Drive `task` until the user quits.
///
/// The loop never blocks on the frame source: a tick without a frame just
/// waits for the next tick. Missed ticks are skipped rather than queued.
pub async fn run<W: Write>(
    source: &FrameSource,
    surface: &mut TerminalSurface<W>,
    task: &mut RenderTask<usize>,
    tick: Duration,
) -> Result<(), AppError> {
    let mut event_stream = EventStream::new();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut capture_lost_logged = false;

    loop {
        if shutdown_requested() {
            log::info!("Termination signal received");
            break;
        }

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if handle_key_event(key_event) == KeyAction::Quit {
                            log::info!("Quit requested");
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(cols, rows))) => {
                        log::debug!("Terminal resized to {}x{}", cols, rows);
                        surface.resize(cols, rows)?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }

            _ = ticker.tick() => {
                // Peek first so a stale frame is never copied out
                let outcome = match source.latest_timestamp() {
                    None => TickOutcome::NoFrame,
                    Some(ts) if task.has_rendered(ts) => TickOutcome::Stale,
                    Some(_) => task.tick(source.latest(), surface)?,
                };
                match outcome {
                    TickOutcome::Rendered(stats) => {
                        log::debug!(
                            "frame {}: {} created, {} updated, {} unchanged",
                            task.frames_rendered(),
                            stats.created,
                            stats.updated,
                            stats.unchanged
                        );
                    }
                    TickOutcome::NoFrame | TickOutcome::Stale => {}
                }

                if !capture_lost_logged && !source.is_running() {
                    log::warn!("Capture ended; showing the last frame");
                    capture_lost_logged = true;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::QuantizedColor;
    use crate::camera::FrameFormat;

    #[derive(Default)]
    struct NullSurface {
        created: usize,
    }

    impl DisplaySurface for NullSurface {
        type Handle = usize;

        fn drawable_size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn create_text(&mut self, _: u32, _: u32, _: char, _: QuantizedColor) -> io::Result<usize> {
            self.created += 1;
            Ok(self.created - 1)
        }

        fn update_text(&mut self, _: usize, _: char, _: QuantizedColor) -> io::Result<()> {
            Ok(())
        }

        fn present(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn task() -> RenderTask<usize> {
        RenderTask::new(PipelineSettings::default(), RenderSettings::default())
    }

    #[test]
    fn test_no_frame_is_noop() {
        let mut surface = NullSurface::default();
        let mut task = task();
        assert_eq!(task.tick(None, &mut surface).unwrap(), TickOutcome::NoFrame);
        assert_eq!(surface.created, 0);
        assert_eq!(task.frames_rendered(), 0);
    }

    #[test]
    fn test_same_frame_is_not_reprocessed() {
        let mut surface = NullSurface::default();
        let mut task = task();
        let frame = Frame::solid(64, 48, FrameFormat::Bgr, (200, 200, 200));

        assert!(matches!(
            task.tick(Some(frame.clone()), &mut surface).unwrap(),
            TickOutcome::Rendered(_)
        ));
        assert_eq!(task.tick(Some(frame), &mut surface).unwrap(), TickOutcome::Stale);
        assert_eq!(task.frames_rendered(), 1);
    }

    #[test]
    fn test_has_rendered_tracks_last_timestamp() {
        let mut surface = NullSurface::default();
        let mut task = task();
        let frame = Frame::solid(64, 48, FrameFormat::Rgb, (90, 90, 90));
        let later = frame.timestamp + Duration::from_millis(33);

        assert!(!task.has_rendered(frame.timestamp));
        task.tick(Some(frame.clone()), &mut surface).unwrap();
        assert!(task.has_rendered(frame.timestamp));
        assert!(!task.has_rendered(later));
    }

    #[test]
    fn test_shutdown_flag_starts_clear() {
        assert!(!shutdown_requested());
    }
}
