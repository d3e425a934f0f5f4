//! Rendering
//!
//! The game draws through the [`Renderer`] capability only. Backends own a
//! [`RenderContext`] (software surface + font) or record draw calls.

pub mod context;
pub mod scene;

pub use context::{RenderContext, Surface};
pub use scene::draw_frame;

use glam::Vec2;

use crate::error::Result;
use crate::sim::Rect;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Packed 0RGB, the layout window framebuffers expect
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);

/// Drawing capability consumed by the game
///
/// All coordinates are frame (window) pixels.
pub trait Renderer {
    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Draw text with its top-left corner at `pos`
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
    /// Width and height `text` would occupy at `size`
    fn measure_text(&self, text: &str, size: f32) -> Vec2;
    /// Show the finished frame
    fn present(&mut self) -> Result<()>;
}

/// Rough glyph metrics for when no font is loaded
pub(crate) fn approximate_text_size(text: &str, size: f32) -> Vec2 {
    Vec2::new(text.chars().count() as f32 * size * 0.6, size)
}
