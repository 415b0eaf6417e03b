//! Failures surfaced while setting up a game screen
//!
//! None of these are recoverable mid-episode: they abort initialisation (or
//! refuse a frame) instead of letting gameplay run against missing state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A scene node the controller drives was not found by name.
    #[error("scene anchor `{0}` not found")]
    MissingAnchor(String),

    /// A frame was requested before the viewport was measured.
    #[error("playfield bounds not initialised; call set_viewport before the first frame")]
    BoundsNotInitialized,

    #[error("invalid playfield bounds: x [{min_x}, {max_x}], z [{min_z}, {max_z}]")]
    InvalidBounds {
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    },

    /// Unprojected half width must be finite and positive.
    #[error("invalid viewport half width {0}")]
    InvalidViewport(f32),

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting {
        name: &'static str,
        reason: &'static str,
    },

    #[error("failed to parse settings: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
