//! Headless backend
//!
//! Plays back scripted events one frame at a time and records every draw
//! call instead of rasterising it.

use std::collections::VecDeque;

use glam::Vec2;

use super::{Event, InputSource};
use crate::error::Result;
use crate::render::{Color, Renderer, approximate_text_size};
use crate::sim::Rect;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect { rect: Rect, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Text { text: String, pos: Vec2, size: f32, color: Color },
}

pub struct HeadlessPlatform {
    width: u32,
    height: u32,
    script: VecDeque<Vec<Event>>,
    /// Draw calls since the last `present`
    commands: Vec<DrawCommand>,
    /// Draw calls of the last presented frame
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
}

impl HeadlessPlatform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            script: VecDeque::new(),
            commands: Vec::new(),
            last_frame: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Queue the events delivered by one future poll
    pub fn push_frame_events(&mut self, events: Vec<Event>) {
        self.script.push_back(events);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl InputSource for HeadlessPlatform {
    fn poll_events(&mut self) -> Vec<Event> {
        let events = self.script.pop_front().unwrap_or_default();
        for event in &events {
            if let Event::Resized { width, height } = *event {
                self.width = width.max(1) as u32;
                self.height = height.max(1) as u32;
            }
        }
        events
    }
}

impl Renderer for HeadlessPlatform {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        approximate_text_size(text, size)
    }

    fn present(&mut self) -> Result<()> {
        self.last_frame = std::mem::take(&mut self.commands);
        self.frames_presented += 1;
        Ok(())
    }
}
