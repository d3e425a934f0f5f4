//! Data-driven game balance
//!
//! Every number the simulation needs that is not a structural constant.
//! Loaded as part of [`crate::Settings`]; missing fields fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ball radius (px)
    pub ball_radius: f32,
    /// Launch speed of a fresh ball (px/s)
    pub ball_speed: f32,

    /// Paddle width (px)
    pub paddle_width: f32,
    /// Paddle height (px)
    pub paddle_height: f32,
    /// Gap between paddle and the player's edge (px)
    pub paddle_margin: f32,
    /// Paddle travel speed (px/s)
    pub paddle_speed: f32,
    /// How much the hit offset on the paddle bends the bounce (0 = none)
    pub paddle_english: f32,

    /// Block grid
    pub block_rows: u32,
    pub block_columns: u32,
    pub block_height: f32,
    pub block_gap: f32,
    /// Distance from the top wall to the first row (px)
    pub block_top_margin: f32,
    /// Block descent toward the player's edge (px/s) on wave 0
    pub block_descent_speed: f32,
    /// Extra descent speed per wave (px/s)
    pub descent_per_wave: f32,

    /// Score for every block hit
    pub points_per_hit: u64,
    /// Balls the player may lose before the run ends
    pub lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_radius: 8.0,
            ball_speed: 240.0,

            paddle_width: 80.0,
            paddle_height: 12.0,
            paddle_margin: 24.0,
            paddle_speed: 300.0,
            paddle_english: 0.5,

            block_rows: 4,
            block_columns: 8,
            block_height: 20.0,
            block_gap: 4.0,
            block_top_margin: 40.0,
            block_descent_speed: 2.0,
            descent_per_wave: 0.5,

            points_per_hit: 10,
            lives: 3,
        }
    }
}

impl Tuning {
    /// Clamp values into ranges the simulation can work with
    pub fn validated(mut self) -> Self {
        self.ball_radius = self.ball_radius.clamp(1.0, 40.0);
        self.ball_speed = self.ball_speed.clamp(10.0, 2000.0);
        self.paddle_width = self.paddle_width.clamp(8.0, 400.0);
        self.paddle_height = self.paddle_height.clamp(2.0, 60.0);
        self.paddle_margin = self.paddle_margin.max(0.0);
        self.paddle_speed = self.paddle_speed.max(0.0);
        self.paddle_english = self.paddle_english.clamp(0.0, 1.0);
        self.block_rows = self.block_rows.clamp(1, 16);
        self.block_columns = self.block_columns.clamp(1, 32);
        self.block_height = self.block_height.clamp(4.0, 80.0);
        self.block_gap = self.block_gap.max(0.0);
        self.block_top_margin = self.block_top_margin.max(0.0);
        self.block_descent_speed = self.block_descent_speed.max(0.0);
        self.descent_per_wave = self.descent_per_wave.max(0.0);
        self.lives = self.lives.max(1);
        self
    }

    /// Block descent speed for a given wave (px/s)
    pub fn descent_speed(&self, wave: u32) -> f32 {
        self.block_descent_speed + self.descent_per_wave * wave as f32
    }
}
