//! Error types for Blocks N Balls

use thiserror::Error;

/// The main error type for game setup and platform operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Window error: {0}")]
    Window(String),

    #[error("Present error: {0}")]
    Present(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
