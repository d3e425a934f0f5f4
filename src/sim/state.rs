//! Game state and core simulation types
//!
//! The simulation exclusively owns every entity; rendering and telemetry
//! only ever read from a `GameState` (or a snapshot of it).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::entity::{BallId, BlockId, BlockKind, Registry};
use super::geometry::Rect;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Game is paused; input is still polled
    Paused,
    /// Run ended; terminal
    GameOver,
}

/// Steering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// The direct reverse of this direction (`None` has no reverse)
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Unit vector in screen space (+y down)
    pub fn as_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::None => Vec2::ZERO,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Last ball lost with no lives left
    OutOfBalls,
    /// A block descended onto the player's edge
    BlocksReachedEdge,
}

/// Things that happened during a tick, drained by the loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BlockHit { block: BlockId, ball: BallId },
    BlockDestroyed { block: BlockId, kind: BlockKind },
    BallSpawned { ball: BallId },
    BallLost { ball: BallId },
    LifeLost { lives_left: u8 },
    WaveCleared { wave: u32 },
    Paused,
    Resumed,
    GameOver { reason: GameOverReason, score: u64 },
}

/// The player's interceptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Travel speed (px/s)
    pub speed: f32,
}

impl Paddle {
    /// Centred on the player's edge of the arena
    pub fn new(arena: &Arena, tuning: &Tuning) -> Self {
        let size = arena.size();
        let width = tuning.paddle_width.min(size);
        let height = tuning.paddle_height;
        let y = (size - tuning.paddle_margin - height).max(0.0);
        Self {
            rect: Rect::new((size - width) / 2.0, y, width, height),
            speed: tuning.paddle_speed,
        }
    }

    /// Move along `direction`, staying inside the arena
    pub fn advance(&mut self, direction: Direction, dt: f32, bounds: Rect) {
        self.rect.pos += direction.as_vec2() * self.speed * dt;
        self.clamp_to(bounds);
    }

    pub fn clamp_to(&mut self, bounds: Rect) {
        let max = (bounds.pos + bounds.size - self.rect.size).max(bounds.pos);
        self.rect.pos = self.rect.pos.clamp(bounds.pos, max);
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG (wave layout, respawn angle)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub registry: Registry,
    pub paddle: Paddle,
    pub phase: GamePhase,
    /// Score; never decreases
    pub score: u64,
    pub lives: u8,
    /// Current wave index (0-based)
    pub wave_index: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Direction the paddle is travelling
    pub current_intent: Direction,
    /// Last requested direction, applied at the top of the next tick
    pub pending_intent: Direction,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// A state with a paddle and no balls or blocks
    pub fn empty(arena: Arena, tuning: Tuning, seed: u64) -> Self {
        let paddle = Paddle::new(&arena, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.lives,
            tuning,
            arena,
            registry: Registry::new(),
            paddle,
            phase: GamePhase::Running,
            score: 0,
            wave_index: 0,
            time_ticks: 0,
            current_intent: Direction::Right,
            pending_intent: Direction::Right,
            events: Vec::new(),
        }
    }

    /// A fresh run: paddle, one ball and the first wave of blocks
    pub fn new(arena: Arena, tuning: Tuning, seed: u64) -> Self {
        let mut state = Self::empty(arena, tuning, seed);
        state.spawn_serve_ball();
        super::tick::generate_wave(&mut state);
        state
    }

    /// Spawn a ball just above the paddle, heading up and to one side
    pub fn spawn_serve_ball(&mut self) -> BallId {
        use rand::Rng;

        let radius = self.tuning.ball_radius;
        let pos = Vec2::new(
            self.paddle.rect.center().x,
            self.paddle.rect.top() - radius - 2.0,
        );
        let side = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let angle = self.rng.random_range(0.3f32..0.6);
        let vel = Vec2::new(side * angle.sin(), -angle.cos()) * self.tuning.ball_speed;

        let id = self.registry.spawn_ball(pos, vel, radius);
        self.events.push(GameEvent::BallSpawned { ball: id });
        id
    }

    /// Add points; the score only ever grows
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Request a direction change for the next tick
    pub fn request_direction(&mut self, direction: Direction) {
        self.pending_intent = direction;
    }

    /// Apply the pending intent unless it would reverse the paddle in place
    pub fn reconcile_intent(&mut self) {
        let pending = self.pending_intent;
        if pending != Direction::None && pending != self.current_intent.opposite() {
            self.current_intent = pending;
        }
    }

    /// Toggle between Running and Paused (no effect once the run is over)
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
                log::debug!("Paused at tick {}", self.time_ticks);
            }
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            self.events.push(GameEvent::Resumed);
            log::debug!("Resumed at tick {}", self.time_ticks);
        }
    }

    /// End the run; the score is frozen from here on
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.score,
        });
        log::info!(
            "Game over ({:?}) at wave {} with score {}",
            reason,
            self.wave_index + 1,
            self.score
        );
    }

    /// Re-derive the arena from new frame dimensions and pull every entity
    /// back inside the new bounds
    pub fn resize(&mut self, width: i32, height: i32) {
        if Arena::needs_clamp(width, height) {
            log::warn!("Resize to {}x{} clamped to minimum frame size", width, height);
        }
        let old_size = self.arena.size();
        self.arena = Arena::from_frame(width, height);
        let bounds = self.arena.bounds();
        let size = self.arena.size();
        let scale = size / old_size.max(1.0);

        // The block layout scales with the arena so no block moves closer
        // to the player's edge than it was
        for ball in self.registry.balls_mut() {
            let r = ball.radius.min(size / 2.0);
            ball.pos = (ball.pos * scale).clamp(Vec2::splat(r), Vec2::splat(size - r));
        }
        for block in self.registry.blocks_mut() {
            block.rect = Rect {
                pos: block.rect.pos * scale,
                size: block.rect.size * scale,
            };
        }

        // Paddle keeps its relative x and sits on the player's edge again
        let centre_x = self.paddle.rect.center().x * scale;
        let mut paddle = Paddle::new(&self.arena, &self.tuning);
        paddle.rect.pos.x = centre_x - paddle.rect.size.x / 2.0;
        paddle.clamp_to(bounds);
        self.paddle = paddle;
        log::debug!(
            "Arena resized: frame {}x{}, wall size {}",
            self.arena.frame_width,
            self.arena.frame_height,
            self.arena.wall_size
        );
    }

    /// Drain the events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{Command, TickInput, apply_input, tick};

    fn empty_state() -> GameState {
        GameState::empty(Arena::from_frame(720, 480), Tuning::default(), 7)
    }

    #[test]
    fn test_new_game_has_ball_and_blocks() {
        let state = GameState::new(Arena::from_frame(720, 480), Tuning::default(), 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.registry.alive_ball_count(), 1);
        let tuning = Tuning::default();
        assert_eq!(
            state.registry.alive_block_count(),
            (tuning.block_rows * tuning.block_columns) as usize
        );
        // Serve ball heads away from the player's edge
        let ball = state.registry.iter_alive_balls().next().unwrap();
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut state = empty_state();
        state.current_intent = Direction::Left;
        state.request_direction(Direction::Right);
        state.reconcile_intent();
        assert_eq!(state.current_intent, Direction::Left);

        state.request_direction(Direction::Up);
        state.reconcile_intent();
        assert_eq!(state.current_intent, Direction::Up);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = empty_state();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.take_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = empty_state();
        state.end_game(GameOverReason::OutOfBalls);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::GameOver);
        state.resume();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_resize_keeps_entities_inside() {
        let mut state = empty_state();
        let id = state
            .registry
            .spawn_ball(Vec2::new(470.0, 470.0), Vec2::ZERO, 8.0);
        state
            .registry
            .spawn_block(Rect::new(400.0, 300.0, 60.0, 20.0), 1);

        state.resize(300, 300);
        assert_eq!(state.arena.wall_size, 300);
        let ball = state.registry.ball(id).unwrap();
        assert!(ball.pos.x <= 292.0 && ball.pos.y <= 292.0);
        let block = state.registry.iter_alive_blocks().next().unwrap();
        assert!(block.rect.right() <= 300.0 && block.rect.bottom() <= 300.0);
        assert!(state.paddle.rect.right() <= 300.0);
    }

    #[test]
    fn test_shrinking_window_does_not_end_run() {
        let mut state = GameState::new(Arena::from_frame(720, 480), Tuning::default(), 4);
        let block_bottom = |state: &GameState| {
            state
                .registry
                .iter_alive_blocks()
                .map(|b| b.rect.bottom() / state.arena.size())
                .fold(0.0f32, f32::max)
        };
        let before = block_bottom(&state);

        apply_input(
            &mut state,
            &TickInput {
                commands: vec![Command::Resize {
                    width: 100,
                    height: 100,
                }],
            },
        );
        assert_eq!(state.arena.wall_size, 100);
        assert!((block_bottom(&state) - before).abs() < 1e-4);
        assert!(state.paddle.rect.bottom() <= 100.0);
        // Blocks stay above the paddle row
        assert!(state.paddle.rect.top() > block_bottom(&state) * state.arena.size());

        tick(&mut state, 1.0 / 120.0);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_resize_rederives_wall_size() {
        let mut state = empty_state();
        state.resize(1000, 640);
        assert_eq!(state.arena.wall_size, 640);
        state.resize(-5, 0);
        assert_eq!(state.arena.wall_size, crate::consts::MIN_FRAME_SIZE);
    }
}
