//! Drawing surface abstraction
//!
//! The minimal set of 2D raster operations the scene needs: filled arcs and
//! polygons, stroked segments, alpha blending, and glow. The wasm backend
//! implements it over `CanvasRenderingContext2d` (glow maps to shadow-blur);
//! tests drive the scene against a recording implementation instead of a
//! real display surface.

use glam::Vec2;

use crate::sim::Color;

/// Horizontal anchoring for [`Surface::fill_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A 2D raster target.
pub trait Surface {
    /// Wipe the whole surface.
    fn clear(&mut self, bounds: Vec2);

    /// Filled circle. `glow` is the shadow-blur radius; 0 disables the glow.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32, glow: f32);

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, alpha: f32);

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color, glow: f32);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color, alpha: f32);

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, color: Color, align: TextAlign);
}
