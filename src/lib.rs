//! ascii-cam library crate.
//!
//! Live camera frames flow through four stages:
//! [`camera::FrameSource`] captures on a background thread,
//! [`ascii::FrameTransform`] turns a frame into a cell-sized color image and
//! brightness map, [`ascii::GlyphMapper`] picks a glyph and palette color per
//! visible cell, and [`renderer::DiffRenderer`] draws only what changed onto
//! a [`renderer::DisplaySurface`].

pub mod ascii;
pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod renderer;
pub mod terminal;
