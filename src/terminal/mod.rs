//! Terminal management: session guard and the glyph display surface.

mod raw_mode;
mod surface;

pub use raw_mode::TerminalGuard;
pub use surface::TerminalSurface;
