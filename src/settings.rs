//! Game settings
//!
//! Loaded from an optional JSON file, then overridden from the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Fonts tried, in order, when no font path is configured
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial window size
    pub frame_width: i32,
    pub frame_height: i32,
    /// Render rate
    pub fps: u32,
    /// Physics rate
    pub tick_rate: u32,
    /// Seconds the game-over screen stays up
    pub game_over_secs: f32,
    /// Run seed (random when absent)
    pub seed: Option<u64>,
    /// Ticks between telemetry snapshots (0 disables telemetry)
    pub telemetry_interval: u32,
    /// Font used for HUD text
    pub font_path: Option<PathBuf>,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            fps: DEFAULT_FPS,
            tick_rate: DEFAULT_TICK_RATE,
            game_over_secs: GAME_OVER_HOLD_SECS,
            seed: None,
            telemetry_interval: DEFAULT_TICK_RATE,
            font_path: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)
            .map_err(|e| Error::Settings(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.validated())
    }

    /// Clamp values into ranges the game can run with
    pub fn validated(mut self) -> Self {
        self.frame_width = self.frame_width.max(MIN_FRAME_SIZE);
        self.frame_height = self.frame_height.max(MIN_FRAME_SIZE);
        self.fps = self.fps.clamp(1, 480);
        self.tick_rate = self.tick_rate.clamp(10, 1000);
        self.game_over_secs = self.game_over_secs.max(0.0);
        self.tuning = self.tuning.validated();
        self
    }

    /// Fixed physics timestep (seconds)
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Target duration of one rendered frame (seconds)
    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// The configured font, or the first well-known system font that exists
    pub fn resolve_font_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        FONT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_window() {
        let settings = Settings::default();
        assert_eq!((settings.frame_width, settings.frame_height), (720, 480));
        assert_eq!(settings.fps, 60);
        assert!((settings.sim_dt() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = std::env::temp_dir().join(format!("bnb-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        std::fs::write(&path, r#"{ "fps": 30, "tuning": { "lives": 5 } }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.tuning.lives, 5);
        assert_eq!(settings.frame_width, DEFAULT_FRAME_WIDTH);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = std::env::temp_dir().join(format!("bnb-settings-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ fps: ").unwrap();

        assert!(matches!(Settings::load(&path), Err(Error::Settings(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validated_clamps_rates() {
        let settings = Settings {
            fps: 0,
            tick_rate: 1,
            frame_width: -10,
            ..Default::default()
        }
        .validated();
        assert_eq!(settings.fps, 1);
        assert_eq!(settings.tick_rate, 10);
        assert_eq!(settings.frame_width, MIN_FRAME_SIZE);
    }
}
