//! Rendering seam between the controller and a drawing back-end.

use xs_core::Color;

/// An axis-aligned filled rectangle in viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

/// Size of the drawable surface in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A back-end able to draw filled quads.
pub trait Renderer {
    fn draw_quad(&mut self, quad: Quad);
}

/// Recording renderer, used for tests and snapshots.
impl Renderer for Vec<Quad> {
    fn draw_quad(&mut self, quad: Quad) {
        self.push(quad);
    }
}
