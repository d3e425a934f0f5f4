//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod state;
pub mod tick;

pub use arena::{Arena, Letterbox};
pub use collision::{CollisionResult, WallOutcome, ball_rect_collision};
pub use entity::{Ball, BallId, Block, BlockId, BlockKind, Registry};
pub use geometry::{
    Circle, Rect, circle_intersects_circle, circle_intersects_rect, closest_edge_normal,
    distance, reflect,
};
pub use state::{Direction, GameEvent, GameOverReason, GamePhase, GameState, Paddle};
pub use tick::{Command, TickInput, apply_input, generate_wave, tick};
