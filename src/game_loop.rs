//! Fixed timestep game loop
//!
//! Each frame: poll input → apply it → step physics zero or more times →
//! render once → sleep until the next frame. Physics only advances in
//! whole `1 / tick_rate` steps, so the simulation is independent of the
//! frame rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS};
use crate::error::Result;
use crate::platform::{Platform, map_events};
use crate::render::draw_frame;
use crate::settings::Settings;
use crate::sim::{Arena, GameEvent, GamePhase, GameState, apply_input, tick};
use crate::telemetry::{Snapshot, Telemetry};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Window closed, Escape pressed or shutdown flag set
    Quit,
    /// The game-over screen finished its hold time
    GameOver { score: u64 },
    /// `run` reached its frame limit
    FrameLimit,
}

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Exit(LoopExit),
}

pub struct GameLoop {
    state: GameState,
    settings: Settings,
    accumulator: f32,
    game_over_elapsed: f32,
    shutdown: Arc<AtomicBool>,
    telemetry: Option<Telemetry>,
    ticks_since_snapshot: u32,
    frame_events: Vec<GameEvent>,
}

impl GameLoop {
    /// A new run sized to the configured frame
    pub fn new(settings: Settings, seed: u64) -> Self {
        let arena = Arena::from_frame(settings.frame_width, settings.frame_height);
        let state = GameState::new(arena, settings.tuning.clone(), seed);
        log::info!("Game initialized with seed: {}", seed);
        Self::with_state(settings, state)
    }

    /// Drive an existing state
    pub fn with_state(settings: Settings, state: GameState) -> Self {
        Self {
            state,
            settings,
            accumulator: 0.0,
            game_over_elapsed: 0.0,
            shutdown: Arc::new(AtomicBool::new(false)),
            telemetry: None,
            ticks_since_snapshot: 0,
            frame_events: Vec::new(),
        }
    }

    /// Start the background telemetry consumer
    pub fn enable_telemetry(&mut self) -> std::io::Result<()> {
        if self.settings.telemetry_interval > 0 && self.telemetry.is_none() {
            self.telemetry = Some(Telemetry::spawn()?);
        }
        Ok(())
    }

    /// Setting this flag stops the loop at the top of the next frame
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Game events produced during the last frame's physics steps
    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    /// Run one frame with `elapsed` seconds of real time since the last one
    pub fn frame<P: Platform + ?Sized>(&mut self, platform: &mut P, elapsed: f32) -> Result<FrameOutcome> {
        if self.shutdown.load(Ordering::Acquire) {
            return Ok(FrameOutcome::Exit(LoopExit::Quit));
        }

        // All of this frame's input lands before any physics step
        let input = map_events(&platform.poll_events());
        if input.quit {
            self.shutdown.store(true, Ordering::Release);
            return Ok(FrameOutcome::Exit(LoopExit::Quit));
        }
        apply_input(&mut self.state, &input.tick_input);
        self.frame_events = self.state.take_events();

        let elapsed = elapsed.clamp(0.0, MAX_FRAME_TIME);
        match self.state.phase {
            GamePhase::Running => self.step(elapsed),
            GamePhase::Paused => self.accumulator = 0.0,
            GamePhase::GameOver => self.game_over_elapsed += elapsed,
        }

        draw_frame(platform, &self.state);
        platform.present()?;

        if self.state.phase == GamePhase::GameOver
            && self.game_over_elapsed >= self.settings.game_over_secs
        {
            return Ok(FrameOutcome::Exit(LoopExit::GameOver {
                score: self.state.score,
            }));
        }
        Ok(FrameOutcome::Continue)
    }

    fn step(&mut self, elapsed: f32) {
        let dt = self.settings.sim_dt();
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, dt);
            self.accumulator -= dt;
            substeps += 1;
            self.after_tick();
            if self.state.phase != GamePhase::Running {
                self.accumulator = 0.0;
                break;
            }
        }

        // Drop time we could not simulate rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(dt);
        }
    }

    fn after_tick(&mut self) {
        for event in self.state.take_events() {
            match event {
                GameEvent::WaveCleared { wave } => log::info!("Wave {} cleared", wave + 1),
                GameEvent::LifeLost { lives_left } => {
                    log::debug!("Life lost, {} remaining", lives_left)
                }
                _ => {}
            }
            self.frame_events.push(event);
        }

        self.ticks_since_snapshot += 1;
        let interval = self.settings.telemetry_interval;
        let due = interval > 0 && self.ticks_since_snapshot >= interval;
        if !(due || self.state.phase == GamePhase::GameOver) {
            return;
        }
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.publish(Snapshot::capture(&self.state));
        }
        self.ticks_since_snapshot = 0;
    }

    /// Run until quit, game over or `max_frames`, pacing frames to the
    /// configured fps
    pub fn run<P: Platform + ?Sized>(&mut self, platform: &mut P, max_frames: Option<u64>) -> Result<LoopExit> {
        let frame_time = Duration::from_secs_f32(self.settings.frame_time());
        let mut last = Instant::now();
        let mut frames = 0u64;

        let exit = loop {
            let frame_start = Instant::now();
            let elapsed = frame_start.duration_since(last).as_secs_f32();
            last = frame_start;

            if let FrameOutcome::Exit(exit) = self.frame(platform, elapsed)? {
                break exit;
            }

            frames += 1;
            if max_frames.is_some_and(|max| frames >= max) {
                break LoopExit::FrameLimit;
            }

            let spent = frame_start.elapsed();
            if spent < frame_time {
                std::thread::sleep(frame_time - spent);
            }
        };

        if let Some(telemetry) = self.telemetry.take() {
            let dropped = telemetry.dropped();
            let summary = telemetry.shutdown();
            log::debug!(
                "Telemetry: {} snapshots, {} dropped, peak score {}",
                summary.snapshots,
                dropped,
                summary.peak_score
            );
        }

        log::info!("Loop exited: {:?} after {} frames", exit, frames);
        Ok(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPlatform;
    use crate::platform::{Event, Key};
    use crate::render::Renderer;
    use crate::sim::{Direction, GameOverReason, Rect};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet_loop() -> GameLoop {
        let settings = Settings {
            tuning: Tuning {
                block_descent_speed: 0.0,
                descent_per_wave: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = GameState::empty(Arena::from_frame(720, 480), settings.tuning.clone(), 1);
        state.current_intent = Direction::None;
        state.pending_intent = Direction::None;
        state
            .registry
            .spawn_block(Rect::new(10.0, 10.0, 20.0, 10.0), 1);
        state
            .registry
            .spawn_ball(Vec2::new(240.0, 240.0), Vec2::new(60.0, 30.0), 8.0);
        GameLoop::with_state(settings, state)
    }

    #[test]
    fn test_fixed_steps_per_frame() {
        let mut game = quiet_loop();
        let mut platform = HeadlessPlatform::new(720, 480);

        // 20 ms at 120 Hz is two whole ticks
        game.frame(&mut platform, 0.02).unwrap();
        assert_eq!(game.state().time_ticks, 2);

        // Less than one tick of time: no step, but a frame is still drawn
        game.frame(&mut platform, 0.001).unwrap();
        assert_eq!(game.state().time_ticks, 2);
        assert_eq!(platform.frames_presented(), 2);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut game = quiet_loop();
        let mut platform = HeadlessPlatform::new(720, 480);
        game.frame(&mut platform, 10.0).unwrap();
        assert_eq!(game.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_pause_freezes_across_frames() {
        let mut game = quiet_loop();
        let mut platform = HeadlessPlatform::new(720, 480);
        platform.push_frame_events(vec![Event::KeyDown(Key::P)]);

        game.frame(&mut platform, 1.0 / 60.0).unwrap();
        assert_eq!(game.state().phase, GamePhase::Paused);
        let frozen: Vec<_> = game.state().registry.iter_alive_balls().map(|b| b.pos).collect();

        for _ in 0..10 {
            game.frame(&mut platform, 1.0 / 60.0).unwrap();
        }
        let now: Vec<_> = game.state().registry.iter_alive_balls().map(|b| b.pos).collect();
        assert_eq!(frozen, now);

        platform.push_frame_events(vec![Event::KeyDown(Key::P)]);
        game.frame(&mut platform, 1.0 / 60.0).unwrap();
        assert_eq!(game.state().phase, GamePhase::Running);
        let moved: Vec<_> = game.state().registry.iter_alive_balls().map(|b| b.pos).collect();
        assert_ne!(frozen, moved);
    }

    #[test]
    fn test_quit_event_exits_immediately() {
        let mut game = quiet_loop();
        let mut platform = HeadlessPlatform::new(720, 480);
        platform.push_frame_events(vec![Event::KeyDown(Key::Escape)]);
        let outcome = game.frame(&mut platform, 1.0 / 60.0).unwrap();
        assert_eq!(outcome, FrameOutcome::Exit(LoopExit::Quit));
        assert_eq!(game.state().time_ticks, 0);
        assert!(game.shutdown_flag().load(Ordering::Acquire));
    }

    #[test]
    fn test_shutdown_flag_stops_next_frame() {
        let mut game = quiet_loop();
        let mut platform = HeadlessPlatform::new(720, 480);
        game.shutdown_flag().store(true, Ordering::Release);
        let exit = game.run(&mut platform, None).unwrap();
        assert_eq!(exit, LoopExit::Quit);
        assert_eq!(platform.frames_presented(), 0);
    }

    #[test]
    fn test_game_over_holds_then_exits() {
        let mut game = quiet_loop();
        game.state.score = 30;
        game.state.end_game(GameOverReason::OutOfBalls);
        let mut platform = HeadlessPlatform::new(720, 480);

        // Hold is 3 s; frames are clamped to 0.1 s
        let mut frames = 0;
        let exit = loop {
            match game.frame(&mut platform, 0.1).unwrap() {
                FrameOutcome::Continue => frames += 1,
                FrameOutcome::Exit(exit) => break exit,
            }
            assert!(frames < 100);
        };
        assert_eq!(exit, LoopExit::GameOver { score: 30 });
        assert!(frames >= 28);
        assert_eq!(game.state().time_ticks, 0);
    }

    #[test]
    fn test_resize_event_rederives_arena() {
        let mut game = quiet_loop();
        let mut platform = HeadlessPlatform::new(720, 480);
        platform.push_frame_events(vec![Event::Resized {
            width: 1000,
            height: 640,
        }]);
        game.frame(&mut platform, 0.0).unwrap();
        assert_eq!(game.state().arena.wall_size, 640);
        assert_eq!(platform.size(), (1000, 640));
    }

    #[test]
    fn test_run_with_frame_limit_and_telemetry() {
        let mut settings = Settings {
            fps: 480,
            telemetry_interval: 1,
            ..Default::default()
        };
        settings.tuning.block_descent_speed = 0.0;
        let mut game = GameLoop::new(settings, 42);
        game.enable_telemetry().unwrap();
        let mut platform = HeadlessPlatform::new(720, 480);
        let exit = game.run(&mut platform, Some(5)).unwrap();
        assert_eq!(exit, LoopExit::FrameLimit);
        assert_eq!(platform.frames_presented(), 5);
    }
}
