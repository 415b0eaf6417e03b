//! Obstacle spawn scheduling
//!
//! A countdown decremented by frame time. When it reaches zero an obstacle is
//! emitted at a random lateral position on the far edge and the countdown is
//! reset to the full interval. Overshoot is discarded, so the effective
//! cadence drifts slightly longer than the interval at low frame rates.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::PlayfieldBounds;

/// Where and how a new obstacle enters the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEvent {
    /// (random x within bounds, 0, far edge)
    pub position: Vec3,
    /// Rotation applied over the flight (radians per axis)
    pub spin: Vec3,
}

/// Countdown between obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    /// Seconds left until the next spawn
    pub remaining: f32,
    /// Fixed reset value
    pub interval: f32,
    /// Upper bound of the random spin per axis
    pub max_spin: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32, max_spin: f32) -> Self {
        Self {
            remaining: interval,
            interval,
            max_spin,
        }
    }

    /// Advance by `dt`; returns a spawn once the countdown runs out.
    ///
    /// Degenerate bounds skip the spawn and restart the countdown.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        bounds: &PlayfieldBounds,
        rng: &mut R,
    ) -> Option<SpawnEvent> {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return None;
        }
        if !bounds.is_valid() {
            log::warn!("Spawn skipped: invalid playfield {:?}", bounds);
            self.remaining = self.interval;
            return None;
        }

        let x = rng.random_range(bounds.min_x..=bounds.max_x);
        let spin = Vec3::new(
            rng.random_range(0.0..=self.max_spin),
            rng.random_range(0.0..=self.max_spin),
            rng.random_range(0.0..=self.max_spin),
        );
        self.remaining = self.interval;

        Some(SpawnEvent {
            position: Vec3::new(x, 0.0, bounds.min_z),
            spin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bounds() -> PlayfieldBounds {
        PlayfieldBounds::new(-10.0, 10.0, -150.0, 50.0).unwrap()
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = SpawnTimer::new(1.0, 10.0);
        assert!(timer.update(0.4, &bounds(), &mut rng).is_none());
        assert!(timer.update(0.4, &bounds(), &mut rng).is_none());
        assert!((timer.remaining - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_overshoot_discarded() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = SpawnTimer::new(1.0, 10.0);
        let event = timer.update(1.3, &bounds(), &mut rng);
        assert!(event.is_some());
        assert_eq!(timer.remaining, 1.0);
        // A second large step still yields only one event per call
        assert!(timer.update(5.0, &bounds(), &mut rng).is_some());
        assert_eq!(timer.remaining, 1.0);
    }

    #[test]
    fn test_exact_zero_spawns() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = SpawnTimer::new(0.5, 10.0);
        assert!(timer.update(0.5, &bounds(), &mut rng).is_some());
    }

    #[test]
    fn test_spawn_position_within_far_edge() {
        let b = bounds();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut timer = SpawnTimer::new(1.0, 10.0);
        for _ in 0..200 {
            let event = timer.update(1.0, &b, &mut rng).unwrap();
            assert!(event.position.x >= b.min_x && event.position.x <= b.max_x);
            assert_eq!(event.position.y, 0.0);
            assert_eq!(event.position.z, b.min_z);
            assert!(event.spin.min_element() >= 0.0 && event.spin.max_element() <= 10.0);
        }
    }

    #[test]
    fn test_invalid_bounds_skip_spawn() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = SpawnTimer::new(1.0, 10.0);
        let inverted = PlayfieldBounds {
            min_x: 5.0,
            max_x: -5.0,
            min_z: -150.0,
            max_z: 50.0,
        };
        assert!(timer.update(1.0, &inverted, &mut rng).is_none());
        assert_eq!(timer.remaining, 1.0);
        let huge = PlayfieldBounds {
            min_x: -f32::MAX,
            max_x: f32::MAX,
            min_z: -150.0,
            max_z: 50.0,
        };
        assert!(timer.update(1.0, &huge, &mut rng).is_none());
    }

    #[test]
    fn test_same_seed_same_positions() {
        let dts = [0.016, 0.5, 0.7, 0.016, 1.2, 0.3, 0.9, 2.0];
        let run = |seed: u64| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut timer = SpawnTimer::new(1.0, 10.0);
            dts.iter()
                .filter_map(|dt| timer.update(*dt, &bounds(), &mut rng))
                .map(|e| e.position.x)
                .collect::<Vec<_>>()
        };
        let a = run(7);
        assert!(!a.is_empty());
        assert_eq!(a, run(7));
    }
}
