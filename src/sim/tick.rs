//! Fixed timestep simulation tick
//!
//! Input is applied once per frame with [`apply_input`]; [`tick`] then
//! advances the game by one fixed step, as many times as the loop's
//! accumulator allows.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    WallOutcome, apply_bounce, find_block_hit, resolve_ball_ball, resolve_ball_paddle,
    resolve_ball_walls,
};
use super::entity::{BallId, BlockKind};
use super::geometry::Rect;
use super::state::{Direction, GameEvent, GameOverReason, GamePhase, GameState};

/// A player command, produced by the input mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request a new paddle direction
    Steer(Direction),
    /// Toggle between Running and Paused
    TogglePause,
    /// Window was resized to the given (raw) dimensions
    Resize { width: i32, height: i32 },
}

/// Commands gathered for one frame, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

/// Apply a frame's commands to the state, in order
///
/// Runs before that frame's physics steps, including while paused so that
/// the player can unpause. A steer command while paused also resumes play.
pub fn apply_input(state: &mut GameState, input: &TickInput) {
    for command in &input.commands {
        match *command {
            Command::Steer(direction) => {
                if state.phase == GamePhase::GameOver {
                    continue;
                }
                state.request_direction(direction);
                state.resume();
            }
            Command::TogglePause => state.toggle_pause(),
            Command::Resize { width, height } => state.resize(width, height),
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;
    state.reconcile_intent();

    let bounds = state.arena.bounds();
    state.paddle.advance(state.current_intent, dt, bounds);

    // Only balls alive at the start of the tick take part in it
    let ball_count = state.registry.balls().len();
    for ball in state.registry.balls_mut()[..ball_count]
        .iter_mut()
        .filter(|b| b.alive)
    {
        ball.pos += ball.vel * dt;
    }

    let points_per_hit = state.tuning.points_per_hit;
    let english = state.tuning.paddle_english;
    let mut lost: Vec<BallId> = Vec::new();
    let mut splits: Vec<(Vec2, Vec2)> = Vec::new();
    let mut destroyed = 0u32;
    let mut points = 0u64;

    for i in 0..ball_count {
        let ball = &mut state.registry.balls_mut()[i];
        if !ball.alive {
            continue;
        }
        if resolve_ball_walls(ball, bounds) == WallOutcome::Lost {
            lost.push(ball.id);
            continue;
        }

        // At most one block per ball per tick
        let hit = find_block_hit(&state.registry.balls()[i], state.registry.blocks());
        if let Some((index, result)) = hit {
            let ball = &mut state.registry.balls_mut()[i];
            apply_bounce(ball, &result);
            let (ball_id, ball_vel) = (ball.id, ball.vel);

            let block = &mut state.registry.blocks_mut()[index];
            let (block_id, kind, centre) = (block.id, block.kind, block.rect.center());
            let killed = block.take_hit();

            points += points_per_hit;
            state.events.push(GameEvent::BlockHit {
                block: block_id,
                ball: ball_id,
            });
            if killed {
                state.registry.remove_block(block_id);
                destroyed += 1;
                state.events.push(GameEvent::BlockDestroyed {
                    block: block_id,
                    kind,
                });
                log::debug!("Block {:?} destroyed by ball {:?}", block_id, ball_id);
                if kind == BlockKind::Splitter {
                    splits.push((centre, Vec2::new(-ball_vel.x, ball_vel.y)));
                }
            }
        }

        resolve_ball_paddle(&mut state.registry.balls_mut()[i], &state.paddle, english);
    }

    {
        let balls = &mut state.registry.balls_mut()[..ball_count];

        // Ball-ball pairs in id order
        for i in 0..ball_count {
            let (head, tail) = balls.split_at_mut(i + 1);
            let a = &mut head[i];
            if !a.alive || lost.contains(&a.id) {
                continue;
            }
            for b in tail.iter_mut().filter(|b| b.alive && !lost.contains(&b.id)) {
                resolve_ball_ball(a, b);
            }
        }

        // Block, paddle and ball push-outs can carry a ball back through a wall
        for ball in balls.iter_mut() {
            if !ball.alive || lost.contains(&ball.id) {
                continue;
            }
            if resolve_ball_walls(ball, bounds) == WallOutcome::Lost {
                lost.push(ball.id);
            }
        }
    }

    state.award(points);

    for &id in &lost {
        state.registry.remove_ball(id);
        state.events.push(GameEvent::BallLost { ball: id });
        log::debug!("Ball {:?} lost", id);
    }

    let radius = state.tuning.ball_radius;
    for (pos, vel) in splits {
        let id = state.registry.spawn_ball(pos, vel, radius);
        state.events.push(GameEvent::BallSpawned { ball: id });
    }

    // Blocks creep toward the player's edge
    let descent = state.tuning.descent_speed(state.wave_index) * dt;
    let edge = bounds.bottom();
    let mut reached_edge = false;
    for block in state.registry.iter_alive_blocks_mut() {
        block.rect.pos.y += descent;
        if block.rect.bottom() >= edge {
            reached_edge = true;
        }
    }

    state.registry.commit_removals();

    if reached_edge {
        state.end_game(GameOverReason::BlocksReachedEdge);
        return;
    }

    if !lost.is_empty() && state.registry.alive_ball_count() == 0 {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost {
            lives_left: state.lives,
        });
        if state.lives == 0 {
            state.end_game(GameOverReason::OutOfBalls);
            return;
        }
        log::info!("Ball lost, {} lives left", state.lives);
        state.spawn_serve_ball();
    }

    if destroyed > 0 && state.registry.alive_block_count() == 0 {
        state.events.push(GameEvent::WaveCleared {
            wave: state.wave_index,
        });
        state.wave_index += 1;
        generate_wave(state);
    }
}

/// Fill the top of the arena with a fresh grid of blocks for the current wave
///
/// Layout is fixed by the tuning; kinds are drawn from the seeded RNG so a
/// given seed always produces the same run.
pub fn generate_wave(state: &mut GameState) {
    let tuning = state.tuning.clone();
    let size = state.arena.size();
    let wave = state.wave_index;

    let columns = tuning.block_columns.max(1);
    let gap = tuning.block_gap;
    let width = ((size - gap * (columns + 1) as f32) / columns as f32).max(1.0);

    // Armored share grows with the wave, capped at half the grid
    let armored_chance = (15 + wave * 5).min(50);
    let splitter_chance = if wave == 0 { 0 } else { 8 };

    let mut counts = [0u32; 3];
    for row in 0..tuning.block_rows {
        let y = tuning.block_top_margin + row as f32 * (tuning.block_height + gap);
        if y + tuning.block_height >= size {
            break;
        }
        for col in 0..columns {
            let x = gap + col as f32 * (width + gap);
            let roll: u32 = state.rng.random_range(0..100);
            let (kind, hp) = if wave == 0 {
                (BlockKind::Standard, 1)
            } else if roll < splitter_chance {
                (BlockKind::Splitter, 1)
            } else if roll < splitter_chance + armored_chance {
                (BlockKind::Armored, if wave >= 3 { 3 } else { 2 })
            } else {
                (BlockKind::Standard, 1)
            };
            counts[kind as usize] += 1;
            state.registry.spawn_block_of_kind(
                Rect::new(x, y, width, tuning.block_height),
                hp,
                kind,
            );
        }
    }

    log::info!(
        "Wave {}: {} standard, {} armored, {} splitter blocks",
        wave + 1,
        counts[BlockKind::Standard as usize],
        counts[BlockKind::Armored as usize],
        counts[BlockKind::Splitter as usize]
    );
}
