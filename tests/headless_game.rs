//! End-to-end runs through the headless backend

use blocks_n_balls::game_loop::FrameOutcome;
use blocks_n_balls::platform::headless::{DrawCommand, HeadlessPlatform};
use blocks_n_balls::platform::{Event, Key};
use blocks_n_balls::sim::{Direction, GameEvent, GamePhase};
use blocks_n_balls::{GameLoop, LoopExit, Settings, Tuning};

const FRAME: f32 = 1.0 / 60.0;

fn settings() -> Settings {
    Settings {
        game_over_secs: 0.5,
        ..Default::default()
    }
}

#[test]
fn steering_is_applied_before_physics() {
    let mut game = GameLoop::new(settings(), 11);
    let mut platform = HeadlessPlatform::new(720, 480);
    assert_eq!(game.state().current_intent, Direction::Right);

    platform.push_frame_events(vec![Event::KeyDown(Key::A)]);
    game.frame(&mut platform, FRAME).unwrap();
    // Left is the reverse of Right: rejected
    assert_eq!(game.state().current_intent, Direction::Right);

    platform.push_frame_events(vec![Event::KeyDown(Key::Up)]);
    game.frame(&mut platform, FRAME).unwrap();
    assert_eq!(game.state().current_intent, Direction::Up);
}

#[test]
fn idle_frames_leave_intent_alone() {
    let mut game = GameLoop::new(settings(), 11);
    let mut platform = HeadlessPlatform::new(720, 480);
    platform.push_frame_events(vec![Event::KeyDown(Key::Down)]);
    game.frame(&mut platform, FRAME).unwrap();
    let pending = game.state().pending_intent;
    for _ in 0..5 {
        game.frame(&mut platform, FRAME).unwrap();
    }
    assert_eq!(game.state().pending_intent, pending);
}

#[test]
fn pause_shows_text_and_freezes_score() {
    let mut game = GameLoop::new(settings(), 3);
    let mut platform = HeadlessPlatform::new(720, 480);
    for _ in 0..30 {
        game.frame(&mut platform, FRAME).unwrap();
    }

    platform.push_frame_events(vec![Event::KeyDown(Key::Pause)]);
    game.frame(&mut platform, FRAME).unwrap();
    assert_eq!(game.state().phase, GamePhase::Paused);
    assert!(game.frame_events().contains(&GameEvent::Paused));
    assert!(platform.last_frame().iter().any(
        |c| matches!(c, DrawCommand::Text { text, .. } if text == "Paused")
    ));

    let ticks = game.state().time_ticks;
    let score = game.state().score;
    for _ in 0..60 {
        game.frame(&mut platform, FRAME).unwrap();
    }
    assert_eq!(game.state().time_ticks, ticks);
    assert_eq!(game.state().score, score);
}

#[test]
fn run_ends_in_game_over_screen() {
    // Blocks fall fast enough to reach the player's edge within a few seconds
    let settings = Settings {
        game_over_secs: 0.5,
        tuning: Tuning {
            block_descent_speed: 400.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut game = GameLoop::new(settings, 8);
    let mut platform = HeadlessPlatform::new(720, 480);

    let mut last_score = 0;
    let exit = loop {
        match game.frame(&mut platform, FRAME).unwrap() {
            FrameOutcome::Continue => {}
            FrameOutcome::Exit(exit) => break exit,
        }
        if game.state().phase == GamePhase::Running {
            assert!(game.state().score >= last_score);
        }
        last_score = game.state().score;
        assert!(platform.frames_presented() < 2_000, "game never ended");
    };

    assert!(matches!(exit, LoopExit::GameOver { .. }));
    assert!(platform.last_frame().iter().any(
        |c| matches!(c, DrawCommand::Text { text, .. } if text == "YOU DIED")
    ));
}

#[test]
fn window_close_quits() {
    let mut game = GameLoop::new(settings(), 1);
    let mut platform = HeadlessPlatform::new(720, 480);
    platform.push_frame_events(vec![]);
    platform.push_frame_events(vec![Event::Quit]);
    let exit = game.run(&mut platform, Some(100)).unwrap();
    assert_eq!(exit, LoopExit::Quit);
    assert_eq!(platform.frames_presented(), 1);
}
