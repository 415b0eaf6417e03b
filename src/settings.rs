//! Game tuning and asset configuration
//!
//! Loaded from JSON when the host provides a file, otherwise the defaults
//! below reproduce the shipped game screen.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Asset and audio file names handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetNames {
    /// Scene holding the camera and dragon anchors
    pub scene: String,
    /// Projectile model
    pub bullet: String,
    /// Obstacle ("ice ball") model
    pub ice_ball: String,
    /// Explosion particle system
    pub explosion_particles: String,
    /// Explosion sound file
    pub explosion_sound: String,
    /// Scene node names looked up at startup
    pub camera_node: String,
    pub player_node: String,
}

impl Default for AssetNames {
    fn default() -> Self {
        Self {
            scene: "art.scnassets/dragon.scn".to_string(),
            bullet: "art.scnassets/bullet.scn".to_string(),
            ice_ball: "art.scnassets/ice_ball.scn".to_string(),
            explosion_particles: "Explosion.scnp".to_string(),
            explosion_sound: "explosion.wav".to_string(),
            camera_node: "camera".to_string(),
            player_node: "dragon".to_string(),
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Steering ===
    /// Lateral speed per unit of device roll
    pub steering_gain: f32,
    /// Camera roll per unit of device roll
    pub roll_factor: f32,
    /// Camera pitch per unit of device pitch
    pub pitch_factor: f32,
    /// Device pitch considered level
    pub pitch_rest: f32,

    // === Spawning ===
    /// Seconds between obstacles
    pub spawn_interval: f32,
    /// Obstacle flight time across the field
    pub obstacle_flight_time: f32,
    /// Max random spin per axis over the flight
    pub obstacle_max_spin: f32,

    // === Projectiles ===
    /// Relative travel of a fired projectile
    pub projectile_travel: Vec3,
    pub projectile_flight_time: f32,

    // === Player hit ===
    pub recoil_offset: Vec3,
    pub recoil_spin: Vec3,
    pub recoil_duration: f32,

    // === Playfield ===
    /// Far edge of the field (obstacle spawn depth)
    pub field_far_z: f32,
    /// Depth from the far edge toward the player
    pub field_depth: f32,

    pub assets: AssetNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steering_gain: STEERING_GAIN,
            roll_factor: ROLL_VISUAL_FACTOR,
            pitch_factor: PITCH_VISUAL_FACTOR,
            pitch_rest: PITCH_REST,

            spawn_interval: SPAWN_INTERVAL,
            obstacle_flight_time: OBSTACLE_FLIGHT_TIME,
            obstacle_max_spin: OBSTACLE_MAX_SPIN,

            projectile_travel: Vec3::new(0.0, 0.0, PROJECTILE_TRAVEL_Z),
            projectile_flight_time: PROJECTILE_FLIGHT_TIME,

            recoil_offset: Vec3::from_array(RECOIL_OFFSET),
            recoil_spin: Vec3::from_array(RECOIL_SPIN),
            recoil_duration: RECOIL_DURATION,

            field_far_z: FIELD_FAR_Z,
            field_depth: FIELD_DEPTH,

            assets: AssetNames::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject tuning that would stall the spawner or divide by zero
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = |name: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GameError::InvalidSetting {
                    name,
                    reason: "must be finite and greater than zero",
                })
            }
        };
        positive("spawn_interval", self.spawn_interval)?;
        positive("obstacle_flight_time", self.obstacle_flight_time)?;
        positive("projectile_flight_time", self.projectile_flight_time)?;
        positive("recoil_duration", self.recoil_duration)?;
        positive("field_depth", self.field_depth)?;
        if !(self.obstacle_max_spin.is_finite() && self.obstacle_max_spin >= 0.0) {
            return Err(GameError::InvalidSetting {
                name: "obstacle_max_spin",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}
