//! Rendering sink
//!
//! The simulation never draws directly; it calls into a [`Renderer`] once per
//! live entity per frame. [`DrawList`] collects those calls into a flat
//! instance buffer ready for GPU upload.

pub mod draw_list;
pub mod vertex;

pub use draw_list::DrawList;
pub use vertex::{CircleInstance, Color, hsl};

use glam::Vec2;

use crate::Viewport;

/// Something that can draw filled circles
pub trait Renderer {
    /// Start a new frame
    fn clear(&mut self, _viewport: Viewport) {}

    /// Draw a filled circle
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Show the running score (whole seconds survived)
    fn score(&mut self, _seconds: u64) {}
}

/// Renderer that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {}
}
