//! Square arena derived from the window frame
//!
//! The frame is rounded down to a 10px grid and the playfield is the
//! largest centred square that fits (`wall_size = min(width, height)`).
//! The simulation works in arena-local coordinates `[0, wall_size]²`;
//! `offset` maps them into frame coordinates for drawing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{FRAME_GRID, MIN_FRAME_SIZE};

/// Which way the arena is letterboxed inside the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Letterbox {
    /// Frame is wider than tall: bars left and right (vertical walls)
    Vertical,
    /// Frame is taller than wide: bars top and bottom (horizontal walls)
    Horizontal,
    /// Frame is already square
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub frame_width: i32,
    pub frame_height: i32,
    pub wall_size: i32,
}

impl Arena {
    /// Build an arena from raw frame dimensions
    ///
    /// Non-positive or tiny dimensions are clamped to `MIN_FRAME_SIZE`.
    pub fn from_frame(width: i32, height: i32) -> Self {
        let frame_width = snap_dimension(width);
        let frame_height = snap_dimension(height);
        Self {
            frame_width,
            frame_height,
            wall_size: frame_width.min(frame_height),
        }
    }

    /// Whether the raw dimensions had to be clamped up to the minimum size
    pub fn needs_clamp(width: i32, height: i32) -> bool {
        width < MIN_FRAME_SIZE || height < MIN_FRAME_SIZE
    }

    /// Side length of the arena as a float
    #[inline]
    pub fn size(&self) -> f32 {
        self.wall_size as f32
    }

    /// Arena-local bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size(), self.size())
    }

    /// Top-left of the arena in frame coordinates
    pub fn offset(&self) -> Vec2 {
        Vec2::new(
            ((self.frame_width - self.wall_size) / 2) as f32,
            ((self.frame_height - self.wall_size) / 2) as f32,
        )
    }

    pub fn letterbox(&self) -> Letterbox {
        if self.frame_width == self.frame_height {
            Letterbox::None
        } else if self.wall_size == self.frame_height {
            Letterbox::Vertical
        } else {
            Letterbox::Horizontal
        }
    }

    /// Arena-local point to frame coordinates
    #[inline]
    pub fn to_frame(&self, p: Vec2) -> Vec2 {
        p + self.offset()
    }

    /// Arena-local rect to frame coordinates
    pub fn rect_to_frame(&self, rect: Rect) -> Rect {
        Rect {
            pos: self.to_frame(rect.pos),
            size: rect.size,
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::from_frame(
            crate::consts::DEFAULT_FRAME_WIDTH,
            crate::consts::DEFAULT_FRAME_HEIGHT,
        )
    }
}

fn snap_dimension(v: i32) -> i32 {
    ((v.max(MIN_FRAME_SIZE)) / FRAME_GRID) * FRAME_GRID
}
