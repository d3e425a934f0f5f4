//! Platform abstraction layer
//!
//! Windowing, input polling and presentation come from a backend:
//! - `native`: a `minifb` window with a software surface
//! - `headless`: scripted events and recorded draw calls (tests, `--headless`)

pub mod headless;
#[cfg(feature = "native")]
pub mod native;

use crate::render::Renderer;
use crate::sim::{Command, Direction, TickInput};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    P,
    Pause,
    Escape,
}

/// Raw platform event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Window closed
    Quit,
    /// Drawable area changed; dimensions are untrusted
    Resized { width: i32, height: i32 },
    KeyDown(Key),
}

/// Input capability consumed by the game
pub trait InputSource {
    /// Events since the last poll; never blocks
    fn poll_events(&mut self) -> Vec<Event>;
}

/// A backend that can both draw and deliver input
pub trait Platform: Renderer + InputSource {}

impl<T: Renderer + InputSource> Platform for T {}

/// Everything a frame's events asked for
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub tick_input: TickInput,
    pub quit: bool,
}

/// Translate raw events into game commands, preserving order
///
/// Arrows and WASD steer, P/Pause toggles pause, Escape quits.
pub fn map_events(events: &[Event]) -> FrameInput {
    let mut frame = FrameInput::default();
    for event in events {
        let command = match *event {
            Event::Quit => {
                frame.quit = true;
                continue;
            }
            Event::Resized { width, height } => Command::Resize { width, height },
            Event::KeyDown(key) => match key {
                Key::Up | Key::W => Command::Steer(Direction::Up),
                Key::Down | Key::S => Command::Steer(Direction::Down),
                Key::Left | Key::A => Command::Steer(Direction::Left),
                Key::Right | Key::D => Command::Steer(Direction::Right),
                Key::P | Key::Pause => Command::TogglePause,
                Key::Escape => {
                    frame.quit = true;
                    continue;
                }
            },
        };
        frame.tick_input.commands.push(command);
    }
    frame
}
