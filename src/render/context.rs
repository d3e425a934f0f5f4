//! Software render context
//!
//! A [`Surface`] is an RGBA framebuffer drawn with `imageproc`. The
//! [`RenderContext`] owns the surface and the HUD font; resizing replaces
//! the surface rather than mutating shared window state.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};

use super::{Color, approximate_text_size};
use crate::error::{Error, Result};
use crate::sim::Rect;

/// An owned RGBA framebuffer
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy pixels out as packed 0RGB
    pub fn write_argb(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(
            self.image
                .pixels()
                .map(|p| Color::rgb(p[0], p[1], p[2]).to_u32()),
        );
    }
}

pub struct RenderContext {
    surface: Surface,
    font: Option<FontVec>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            font: None,
        }
    }

    /// Load a TrueType/OpenType font for text drawing
    pub fn load_font(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))?;
        self.font = Some(font);
        log::info!("Loaded font {}", path.display());
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Replace the surface with one of the new size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width != self.surface.width() || height != self.surface.height() {
            self.surface = Surface::new(width, height);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    pub fn clear(&mut self, color: Color) {
        let px = to_rgba(color);
        for p in self.surface.image.pixels_mut() {
            *p = px;
        }
    }

    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let w = rect.size.x.round();
        let h = rect.size.y.round();
        if w < 1.0 || h < 1.0 {
            return;
        }
        let r = imageproc::rect::Rect::at(rect.pos.x.round() as i32, rect.pos.y.round() as i32)
            .of_size(w as u32, h as u32);
        draw_filled_rect_mut(&mut self.surface.image, r, to_rgba(color));
    }

    /// Thick lines are drawn as parallel one-pixel segments
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let px = to_rgba(color);
        let dir = (to - from).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);
        let strands = width.round().max(1.0) as i32;
        for i in 0..strands {
            let shift = perp * (i as f32 - (strands - 1) as f32 / 2.0);
            let a = from + shift;
            let b = to + shift;
            draw_line_segment_mut(&mut self.surface.image, (a.x, a.y), (b.x, b.y), px);
        }
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_filled_circle_mut(
            &mut self.surface.image,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round().max(1.0) as i32,
            to_rgba(color),
        );
    }

    /// Text is skipped when no font is loaded
    pub fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        if let Some(font) = &self.font {
            draw_text_mut(
                &mut self.surface.image,
                to_rgba(color),
                pos.x.round() as i32,
                pos.y.round() as i32,
                PxScale::from(size),
                font,
                text,
            );
        }
    }

    pub fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        match &self.font {
            Some(font) => {
                let (w, h) = text_size(PxScale::from(size), font, text);
                Vec2::new(w as f32, h as f32)
            }
            None => approximate_text_size(text, size),
        }
    }
}

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}
