//! Blocks N Balls entry point
//!
//! Parses the command line, opens the window and runs the game loop.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use blocks_n_balls::platform::headless::HeadlessPlatform;
use blocks_n_balls::{GameLoop, LoopExit, Settings};

#[derive(Parser)]
#[command(name = "blocks-n-balls")]
#[command(about = "Balls bounce, blocks fall, you intercept", long_about = None)]
#[command(version)]
struct Cli {
    /// The width of the game frame
    #[arg(long)]
    width: Option<i32>,

    /// The height of the game frame
    #[arg(long)]
    height: Option<i32>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Run seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font for HUD text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Run without a window, recording draw calls only
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

impl Cli {
    fn settings(&self) -> blocks_n_balls::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(width) = self.width {
            settings.frame_width = width;
        }
        if let Some(height) = self.height {
            settings.frame_height = height;
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.font.is_some() {
            settings.font_path = self.font.clone();
        }
        Ok(settings.validated())
    }
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn run(cli: &Cli) -> blocks_n_balls::Result<LoopExit> {
    let settings = cli.settings()?;
    let seed = settings.seed.unwrap_or_else(time_seed);
    let (width, height) = (settings.frame_width, settings.frame_height);
    let font = settings.resolve_font_path();

    let mut game = GameLoop::new(settings, seed);
    game.enable_telemetry()?;

    if cli.headless {
        let mut platform = HeadlessPlatform::new(width as u32, height as u32);
        return game.run(&mut platform, cli.frames.or(Some(600)));
    }

    run_native(&mut game, width, height, font.as_deref(), cli.frames)
}

#[cfg(feature = "native")]
fn run_native(
    game: &mut GameLoop,
    width: i32,
    height: i32,
    font: Option<&std::path::Path>,
    frames: Option<u64>,
) -> blocks_n_balls::Result<LoopExit> {
    use blocks_n_balls::platform::native::NativePlatform;

    let mut platform = NativePlatform::new("Blocks N Balls", width as usize, height as usize, font)?;
    log::info!("Game successfully initialised");
    game.run(&mut platform, frames)
}

#[cfg(not(feature = "native"))]
fn run_native(
    _game: &mut GameLoop,
    _width: i32,
    _height: i32,
    _font: Option<&std::path::Path>,
    _frames: Option<u64>,
) -> blocks_n_balls::Result<LoopExit> {
    Err(blocks_n_balls::Error::Window(
        "built without the `native` feature; use --headless".into(),
    ))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Blocks N Balls starting...");

    let cli = Cli::parse();
    match run(&cli) {
        Ok(LoopExit::GameOver { score }) => {
            log::info!("Final score: {}", score);
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Failed to run game, exiting: {}", e);
            ExitCode::FAILURE
        }
    }
}
