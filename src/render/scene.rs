//! Translate game state into draw calls
//!
//! Read-only over [`GameState`]; nothing here mutates the simulation.

use glam::Vec2;

use super::{BLACK, BLUE, Color, GREEN, LIGHT_GRAY, RED, Renderer, WHITE};
use crate::consts::WALL_LINE_WIDTH;
use crate::sim::{Arena, BlockKind, GamePhase, GameState, Letterbox};

/// Draw one complete frame for the current phase
pub fn draw_frame<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState) {
    match state.phase {
        GamePhase::GameOver => draw_game_over(renderer, state),
        GamePhase::Running | GamePhase::Paused => {
            renderer.clear(BLACK);
            draw_walls(renderer, &state.arena);
            draw_entities(renderer, state);
            draw_hud(renderer, state, WHITE, 16.0);
            if state.phase == GamePhase::Paused {
                draw_pause(renderer, &state.arena);
            }
        }
    }
}

/// Letterbox lines marking the square arena
pub fn draw_walls<R: Renderer + ?Sized>(renderer: &mut R, arena: &Arena) {
    let fw = arena.frame_width as f32;
    let fh = arena.frame_height as f32;
    let offset = arena.offset();
    let size = arena.size();

    match arena.letterbox() {
        Letterbox::Horizontal => {
            for y in [offset.y, offset.y + size] {
                renderer.draw_line(Vec2::new(0.0, y), Vec2::new(fw, y), WALL_LINE_WIDTH, WHITE);
            }
        }
        Letterbox::Vertical => {
            for x in [offset.x, offset.x + size] {
                renderer.draw_line(Vec2::new(x, 0.0), Vec2::new(x, fh), WALL_LINE_WIDTH, WHITE);
            }
        }
        Letterbox::None => {}
    }
}

fn block_color(kind: BlockKind, hit_points: u8) -> Color {
    match kind {
        BlockKind::Standard => GREEN,
        BlockKind::Splitter => BLUE,
        BlockKind::Armored if hit_points > 1 => LIGHT_GRAY,
        BlockKind::Armored => Color::rgb(120, 120, 120),
    }
}

pub fn draw_entities<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState) {
    let arena = &state.arena;

    for block in state.registry.iter_alive_blocks() {
        renderer.draw_rect(
            arena.rect_to_frame(block.rect),
            block_color(block.kind, block.hit_points),
        );
    }

    renderer.draw_rect(arena.rect_to_frame(state.paddle.rect), WHITE);

    for ball in state.registry.iter_alive_balls() {
        renderer.draw_circle(arena.to_frame(ball.pos), ball.radius, WHITE);
    }
}

/// Score and lives in the top-left corner
pub fn draw_hud<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState, color: Color, size: f32) {
    let arena = &state.arena;
    let pos = Vec2::new(
        (arena.frame_width / 25) as f32,
        (arena.frame_height / 25) as f32,
    );
    renderer.draw_text(&format!("Score : {}", state.score), pos, size, color);
    if state.phase != GamePhase::GameOver {
        renderer.draw_text(
            &format!("Lives : {}  Wave : {}", state.lives, state.wave_index + 1),
            pos + Vec2::new(0.0, size * 1.25),
            size,
            color,
        );
    }
}

/// "Paused" centred in the frame
pub fn draw_pause<R: Renderer + ?Sized>(renderer: &mut R, arena: &Arena) {
    let size = 30.0;
    let text = "Paused";
    let extent = renderer.measure_text(text, size);
    let pos = Vec2::new(
        (arena.frame_width / 2) as f32 - extent.x / 2.0,
        (arena.frame_height / 2) as f32 - extent.y / 2.0,
    );
    renderer.draw_text(text, pos, size, RED);
}

/// Final screen: "YOU DIED" and the frozen score
pub fn draw_game_over<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState) {
    let arena = &state.arena;
    renderer.clear(BLACK);

    let size = 90.0;
    let text = "YOU DIED";
    let extent = renderer.measure_text(text, size);
    let pos = Vec2::new(
        (arena.frame_width / 2) as f32 - extent.x / 2.0,
        (arena.frame_height / 4) as f32,
    );
    renderer.draw_text(text, pos, size, RED);
    draw_hud(renderer, state, RED, 20.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DrawCommand, HeadlessPlatform};
    use crate::sim::GameOverReason;
    use crate::tuning::Tuning;

    fn texts(platform: &HeadlessPlatform) -> Vec<String> {
        platform
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_running_frame_draws_vertical_walls_and_score() {
        let state = GameState::new(Arena::from_frame(720, 480), Tuning::default(), 1);
        let mut platform = HeadlessPlatform::new(720, 480);
        draw_frame(&mut platform, &state);

        let lines: Vec<_> = platform
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lines,
            vec![
                (Vec2::new(120.0, 0.0), Vec2::new(120.0, 480.0)),
                (Vec2::new(600.0, 0.0), Vec2::new(600.0, 480.0)),
            ]
        );
        assert!(texts(&platform).contains(&"Score : 0".to_string()));
        assert!(!texts(&platform).contains(&"Paused".to_string()));
    }

    #[test]
    fn test_blocks_are_offset_into_frame() {
        let state = GameState::new(Arena::from_frame(720, 480), Tuning::default(), 1);
        let mut platform = HeadlessPlatform::new(720, 480);
        draw_entities(&mut platform, &state);

        let first_block = state.registry.iter_alive_blocks().next().unwrap();
        let drawn = platform.commands().iter().find_map(|c| match c {
            DrawCommand::Rect { rect, .. } => Some(*rect),
            _ => None,
        });
        assert_eq!(drawn.map(|r| r.pos.x), Some(first_block.rect.pos.x + 120.0));
    }

    #[test]
    fn test_paused_frame_shows_pause_text() {
        let mut state = GameState::new(Arena::from_frame(720, 480), Tuning::default(), 1);
        state.toggle_pause();
        let mut platform = HeadlessPlatform::new(720, 480);
        draw_frame(&mut platform, &state);
        assert!(texts(&platform).contains(&"Paused".to_string()));
    }

    #[test]
    fn test_game_over_frame() {
        let mut state = GameState::new(Arena::from_frame(480, 720), Tuning::default(), 1);
        state.score = 120;
        state.end_game(GameOverReason::OutOfBalls);
        let mut platform = HeadlessPlatform::new(480, 720);
        draw_frame(&mut platform, &state);
        let texts = texts(&platform);
        assert!(texts.contains(&"YOU DIED".to_string()));
        assert!(texts.contains(&"Score : 120".to_string()));
    }
}
