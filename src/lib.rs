//! Dragon Fury - tilt-to-steer arcade shooter core
//!
//! Core modules:
//! - `sim`: Gameplay logic (steering, obstacle spawning, contact resolution)
//! - `presentation`: Command interface to the host scene/audio/HUD
//! - `audio`: Sound effect ids and their configured files
//! - `settings`: Data-driven tuning and asset names
//! - `error`: Initialisation and configuration failures
//!
//! The host engine owns rendering, physics integration, audio mixing and UI
//! layout. This crate only decides what happens and issues commands.

pub mod audio;
pub mod error;
pub mod presentation;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use presentation::{Command, EntityHandle, Presentation, RecordingPresentation};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Lateral speed per unit of roll (units/s)
    pub const STEERING_GAIN: f32 = 200.0;
    /// Camera roll change per unit of roll (cosmetic)
    pub const ROLL_VISUAL_FACTOR: f32 = 0.1;
    /// Camera pitch change per unit of pitch (cosmetic)
    pub const PITCH_VISUAL_FACTOR: f32 = 0.1;
    /// Device pitch treated as "level" when holding the phone
    pub const PITCH_REST: f32 = 0.75;

    /// Seconds between obstacle spawns
    pub const SPAWN_INTERVAL: f32 = 1.0;

    /// Obstacle flight time from far edge to near edge (seconds)
    pub const OBSTACLE_FLIGHT_TIME: f32 = 3.0;
    /// Upper bound of the random spin per axis (radians over the flight)
    pub const OBSTACLE_MAX_SPIN: f32 = 10.0;

    /// Projectile travel along Z (negative = away from the player)
    pub const PROJECTILE_TRAVEL_Z: f32 = -150.0;
    /// Projectile flight time (seconds)
    pub const PROJECTILE_FLIGHT_TIME: f32 = 1.5;

    /// Player recoil when hit
    pub const RECOIL_OFFSET: [f32; 3] = [0.0, 5.0, 20.0];
    pub const RECOIL_SPIN: [f32; 3] = [0.0, 0.0, std::f32::consts::TAU];
    pub const RECOIL_DURATION: f32 = 1.0;

    /// Playfield depth: far edge Z and total depth toward the player
    pub const FIELD_FAR_Z: f32 = -150.0;
    pub const FIELD_DEPTH: f32 = 200.0;

    /// Device motion sampling rate (Hz)
    pub const MOTION_SAMPLE_HZ: f32 = 60.0;
}

/// Saturating clamp that never panics, unlike `f32::clamp` with min > max.
///
/// With an uninitialised (all-zero) range every value collapses to zero.
#[inline]
pub fn clamp_lateral(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_lateral_saturates() {
        assert_eq!(clamp_lateral(25.0, -10.0, 10.0), 10.0);
        assert_eq!(clamp_lateral(-25.0, -10.0, 10.0), -10.0);
        assert_eq!(clamp_lateral(3.5, -10.0, 10.0), 3.5);
    }

    #[test]
    fn test_clamp_lateral_zero_range() {
        assert_eq!(clamp_lateral(7.0, 0.0, 0.0), 0.0);
        assert_eq!(clamp_lateral(-7.0, 0.0, 0.0), 0.0);
    }
}
