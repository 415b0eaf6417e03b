//! Game state and core simulation types
//!
//! Only scalars and opaque handles live here; scene nodes stay with the host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clamp_lateral;
use crate::error::GameError;
use crate::presentation::EntityHandle;
use crate::settings::Settings;

/// Playable rectangle on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayfieldBounds {
    pub min_x: f32,
    pub max_x: f32,
    /// Far edge, where obstacles appear
    pub min_z: f32,
    /// Near edge, where obstacles leave the field
    pub max_z: f32,
}

impl PlayfieldBounds {
    /// Uninitialised bounds: every lateral position clamps to 0
    pub const ZERO: Self = Self {
        min_x: 0.0,
        max_x: 0.0,
        min_z: 0.0,
        max_z: 0.0,
    };

    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Result<Self, GameError> {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
        .validated()
    }

    /// Finite, non-empty rectangle whose extents are themselves finite
    pub fn is_valid(&self) -> bool {
        let Self {
            min_x,
            max_x,
            min_z,
            max_z,
        } = *self;
        [min_x, max_x, min_z, max_z].iter().all(|v| v.is_finite())
            && min_x < max_x
            && min_z < max_z
            && (max_x - min_x).is_finite()
            && (max_z - min_z).is_finite()
    }

    /// Check bounds built field by field (or deserialized)
    pub fn validated(self) -> Result<Self, GameError> {
        if !self.is_valid() {
            return Err(GameError::InvalidBounds {
                min_x: self.min_x,
                max_x: self.max_x,
                min_z: self.min_z,
                max_z: self.max_z,
            });
        }
        Ok(self)
    }

    /// Bounds from the unprojected half width of the viewport at the
    /// player's depth; depth comes from settings.
    pub fn from_half_width(half_width: f32, settings: &Settings) -> Result<Self, GameError> {
        let half_width = half_width.abs();
        if !half_width.is_finite() || half_width == 0.0 {
            return Err(GameError::InvalidViewport(half_width));
        }
        Self::new(
            -half_width,
            half_width,
            settings.field_far_z,
            settings.field_far_z + settings.field_depth,
        )
    }

    /// True until the viewport has been measured
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        clamp_lateral(x, self.min_x, self.max_x)
    }
}

/// Tilt steering of the camera/dragon anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steering {
    /// Lateral velocity (last device roll sample)
    pub velocity: f32,
    /// Lateral position, always within bounds after an update
    pub position: f32,
    /// Camera orientation at scene load
    pub base_euler: Vec3,
    /// Current camera orientation (cosmetic)
    pub euler: Vec3,
    gain: f32,
    roll_factor: f32,
    pitch_factor: f32,
    pitch_rest: f32,
}

impl Steering {
    pub fn new(position: f32, base_euler: Vec3, settings: &Settings) -> Self {
        Self {
            velocity: 0.0,
            position,
            base_euler,
            euler: base_euler,
            gain: settings.steering_gain,
            roll_factor: settings.roll_factor,
            pitch_factor: settings.pitch_factor,
            pitch_rest: settings.pitch_rest,
        }
    }

    /// Record a device motion sample. Last write wins.
    pub fn sample_input(&mut self, roll: f32, pitch: f32) {
        self.velocity = roll;
        self.euler.z = self.base_euler.z - roll * self.roll_factor;
        self.euler.x = self.base_euler.x - (pitch - self.pitch_rest) * self.pitch_factor;
    }

    /// Integrate lateral motion for one frame and refresh the roll visual
    pub fn update(&mut self, dt: f32, bounds: &PlayfieldBounds) {
        let candidate = self.position + self.velocity * self.gain * dt;
        self.position = bounds.clamp_x(candidate);
        self.euler.z = self.base_euler.z - self.velocity * self.roll_factor;
    }
}

/// Obstacles shot down this episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounter(u32);

impl HitCounter {
    pub fn count(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) -> u32 {
        self.0 = self.0.saturating_add(1);
        self.0
    }

    /// HUD text
    pub fn label(&self) -> String {
        format!("{} HITS", self.0)
    }
}

/// Entity lifecycle before removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Created this frame, motion not yet advanced
    Spawned,
    InFlight,
}

/// Why an entity left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyReason {
    ReachedDestination,
    /// Obstacle hit by a projectile, or projectile that hit an obstacle
    Collision,
}

/// A falling ice ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub handle: EntityHandle,
    pub spawn: Vec3,
    pub lifecycle: Lifecycle,
}

/// A fired shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub handle: EntityHandle,
    pub spawn: Vec3,
    pub lifecycle: Lifecycle,
}

/// Whether the dragon is still in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Dragon removed; the anchor keeps steering but cannot fire
    PlayerDestroyed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> PlayfieldBounds {
        PlayfieldBounds::new(-10.0, 10.0, -150.0, 50.0).unwrap()
    }

    #[test]
    fn test_bounds_reject_inverted() {
        assert!(PlayfieldBounds::new(10.0, -10.0, -150.0, 50.0).is_err());
        assert!(PlayfieldBounds::new(-10.0, 10.0, 50.0, 50.0).is_err());
        assert!(PlayfieldBounds::new(f32::NAN, 10.0, -150.0, 50.0).is_err());
    }

    #[test]
    fn test_bounds_reject_overflowing_span() {
        assert!(PlayfieldBounds::new(-f32::MAX, f32::MAX, -150.0, 50.0).is_err());
        assert!(matches!(
            PlayfieldBounds::from_half_width(f32::MAX, &Settings::default()),
            Err(GameError::InvalidBounds { .. })
        ));
        let inverted = PlayfieldBounds {
            min_x: 5.0,
            max_x: -5.0,
            min_z: -150.0,
            max_z: 50.0,
        };
        assert!(!inverted.is_valid());
        assert!(inverted.validated().is_err());
        assert!(!PlayfieldBounds::ZERO.is_valid());
    }

    #[test]
    fn test_bounds_from_half_width() {
        let b = PlayfieldBounds::from_half_width(-12.5, &Settings::default()).unwrap();
        assert_eq!(b, PlayfieldBounds::new(-12.5, 12.5, -150.0, 50.0).unwrap());
        assert!(matches!(
            PlayfieldBounds::from_half_width(0.0, &Settings::default()),
            Err(GameError::InvalidViewport(_))
        ));
        assert!(PlayfieldBounds::from_half_width(f32::INFINITY, &Settings::default()).is_err());
    }

    #[test]
    fn test_steering_reaches_edge_exactly() {
        let b = bounds();
        let mut steering = Steering::new(0.0, Vec3::ZERO, &Settings::default());
        steering.sample_input(1.0, 0.75);
        steering.update(0.05, &b);
        assert_eq!(steering.position, 10.0);
        steering.update(0.05, &b);
        assert_eq!(steering.position, 10.0);
    }

    #[test]
    fn test_steering_saturates_left() {
        let mut steering = Steering::new(0.0, Vec3::ZERO, &Settings::default());
        steering.sample_input(-3.0, 0.75);
        steering.update(1.0, &bounds());
        assert_eq!(steering.position, -10.0);
    }

    #[test]
    fn test_steering_zero_bounds_pins_to_origin() {
        let mut steering = Steering::new(0.0, Vec3::ZERO, &Settings::default());
        steering.sample_input(0.5, 0.0);
        steering.update(0.1, &PlayfieldBounds::ZERO);
        assert_eq!(steering.position, 0.0);
    }

    #[test]
    fn test_steering_visual_angles() {
        let base = Vec3::new(-0.4, 0.0, 0.2);
        let mut steering = Steering::new(0.0, base, &Settings::default());
        steering.sample_input(0.5, 1.25);
        assert!((steering.euler.z - (0.2 - 0.05)).abs() < 1e-6);
        assert!((steering.euler.x - (-0.4 - 0.05)).abs() < 1e-6);

        steering.velocity = -1.0;
        steering.update(0.0, &bounds());
        assert!((steering.euler.z - 0.3).abs() < 1e-6);
        // Pitch is only touched by samples
        assert!((steering.euler.x - (-0.45)).abs() < 1e-6);
    }

    #[test]
    fn test_last_sample_wins() {
        let mut steering = Steering::new(0.0, Vec3::ZERO, &Settings::default());
        steering.sample_input(0.9, 0.0);
        steering.sample_input(-0.2, 0.0);
        assert_eq!(steering.velocity, -0.2);
    }

    #[test]
    fn test_hit_counter_label() {
        let mut hits = HitCounter::default();
        assert_eq!(hits.label(), "0 HITS");
        for _ in 0..10 {
            hits.increment();
        }
        assert_eq!(hits.count(), 10);
        assert_eq!(hits.label(), "10 HITS");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn steering_stays_in_bounds(
                start in -10.0f32..=10.0,
                velocity in -1.0e3f32..1.0e3,
                dt in 0.0f32..5.0,
            ) {
                let b = bounds();
                let mut steering = Steering::new(start, Vec3::ZERO, &Settings::default());
                steering.sample_input(velocity, 0.0);
                steering.update(dt, &b);
                prop_assert!(steering.position >= b.min_x && steering.position <= b.max_x);
            }
        }
    }
}
