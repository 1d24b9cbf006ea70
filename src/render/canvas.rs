//! Canvas 2D backend
//!
//! Implements [`Surface`] over `CanvasRenderingContext2d`. Glow maps to the
//! context's shadow-blur with the shadow color matching the fill. Every op
//! sets its own alpha so nothing leaks between draws.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{Surface, TextAlign};
use crate::sim::Color;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2d context. `None` is a fatal precondition for the host;
    /// the page must provide a canvas that supports it.
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }
}

fn css(color: Color) -> String {
    match color {
        Color::Named(name) => name.to_string(),
        Color::Hsl { hue, lightness } => format!("hsl({hue}, 100%, {lightness}%)"),
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, bounds: Vec2) {
        self.ctx
            .clear_rect(0.0, 0.0, bounds.x as f64, bounds.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32, glow: f32) {
        let style = css(color);
        self.ctx.set_fill_style_str(&style);
        self.ctx.set_global_alpha(alpha as f64);
        if glow > 0.0 {
            self.ctx.set_shadow_blur(glow as f64);
            self.ctx.set_shadow_color(&style);
        }
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
        if glow > 0.0 {
            self.ctx.set_shadow_blur(0.0);
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, alpha: f32) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color, glow: f32) {
        let style = css(color);
        self.ctx.set_fill_style_str(&style);
        if glow > 0.0 {
            self.ctx.set_shadow_blur(glow as f64);
            self.ctx.set_shadow_color(&style);
        }
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x as f64, points[0].y as f64);
        self.ctx.line_to(points[1].x as f64, points[1].y as f64);
        self.ctx.line_to(points[2].x as f64, points[2].y as f64);
        self.ctx.close_path();
        self.ctx.fill();
        if glow > 0.0 {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color, alpha: f32) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, color: Color, align: TextAlign) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.set_font(&format!("{size_px}px Arial"));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
