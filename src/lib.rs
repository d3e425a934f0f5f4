//! Blocks N Balls - A square arena arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, collisions, game state)
//! - `game_loop`: Fixed timestep loop driving the simulation and rendering
//! - `render`: Scene drawing over an abstract `Renderer`
//! - `platform`: Input events and window backends (native + headless)
//! - `telemetry`: Read-only snapshot consumer on a background thread
//! - `settings`: Window, pacing and startup configuration
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod game_loop;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod telemetry;
pub mod tuning;

pub use error::{Error, Result};
pub use game_loop::{GameLoop, LoopExit};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default physics tick rate (Hz)
    pub const DEFAULT_TICK_RATE: u32 = 120;
    /// Default render rate (frames per second)
    pub const DEFAULT_FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame we are willing to simulate (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Default window size
    pub const DEFAULT_FRAME_WIDTH: i32 = 720;
    pub const DEFAULT_FRAME_HEIGHT: i32 = 480;
    /// Frame dimensions are rounded down to this grid
    pub const FRAME_GRID: i32 = 10;
    /// Smallest frame dimension a resize can produce
    pub const MIN_FRAME_SIZE: i32 = 100;

    /// Thickness of the letterbox wall lines
    pub const WALL_LINE_WIDTH: f32 = 5.0;

    /// How long the game-over screen stays up (seconds)
    pub const GAME_OVER_HOLD_SECS: f32 = 3.0;
}
