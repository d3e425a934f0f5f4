//! Native window backend
//!
//! A resizable `minifb` window presenting a software [`RenderContext`].

use std::path::Path;

use glam::Vec2;
use minifb::{KeyRepeat, Window, WindowOptions};

use super::{Event, InputSource, Key};
use crate::error::{Error, Result};
use crate::render::{Color, RenderContext, Renderer};
use crate::sim::Rect;

pub struct NativePlatform {
    window: Window,
    context: RenderContext,
    buffer: Vec<u32>,
    size: (usize, usize),
}

impl NativePlatform {
    /// Open the game window
    ///
    /// A missing or unreadable font is not fatal: text is skipped.
    pub fn new(title: &str, width: usize, height: usize, font: Option<&Path>) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| Error::Window(e.to_string()))?;

        let mut context = RenderContext::new(width as u32, height as u32);
        match font {
            Some(path) => {
                if let Err(e) = context.load_font(path) {
                    log::warn!("Text disabled: {}", e);
                }
            }
            None => log::warn!("No font found, text disabled"),
        }

        log::info!("Window opened at {}x{}", width, height);
        Ok(Self {
            window,
            context,
            buffer: Vec::with_capacity(width * height),
            size: (width, height),
        })
    }
}

fn map_key(key: minifb::Key) -> Option<Key> {
    use minifb::Key as K;
    Some(match key {
        K::Up => Key::Up,
        K::Down => Key::Down,
        K::Left => Key::Left,
        K::Right => Key::Right,
        K::W => Key::W,
        K::A => Key::A,
        K::S => Key::S,
        K::D => Key::D,
        K::P => Key::P,
        K::Pause => Key::Pause,
        K::Escape => Key::Escape,
        _ => return None,
    })
}

impl InputSource for NativePlatform {
    fn poll_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.window.is_open() {
            events.push(Event::Quit);
            return events;
        }

        let size = self.window.get_size();
        if size != self.size {
            self.size = size;
            self.context.resize(size.0 as u32, size.1 as u32);
            events.push(Event::Resized {
                width: size.0 as i32,
                height: size.1 as i32,
            });
        }

        events.extend(
            self.window
                .get_keys_pressed(KeyRepeat::No)
                .into_iter()
                .filter_map(map_key)
                .map(Event::KeyDown),
        );
        events
    }
}

impl Renderer for NativePlatform {
    fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    fn clear(&mut self, color: Color) {
        self.context.clear(color);
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.context.draw_rect(rect, color);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.context.draw_line(from, to, width, color);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.context.draw_circle(center, radius, color);
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.context.draw_text(text, pos, size, color);
    }

    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        self.context.measure_text(text, size)
    }

    fn present(&mut self) -> Result<()> {
        let surface = self.context.surface();
        surface.write_argb(&mut self.buffer);
        self.window
            .update_with_buffer(
                &self.buffer,
                surface.width() as usize,
                surface.height() as usize,
            )
            .map_err(|e| Error::Present(e.to_string()))
    }
}
