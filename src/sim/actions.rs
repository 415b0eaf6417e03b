//! Scripted motion tracking
//!
//! The host animates entities; this tracker mirrors each running motion with
//! the same frame time the gameplay uses so the core knows when a motion ends
//! (and the entity must be removed) and where the entity currently is.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::presentation::{EntityHandle, MotionSpec};

/// What happens when a scripted motion finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnComplete {
    /// Remove the entity from the scene
    Remove,
    /// Leave the entity where the motion ended
    Keep,
}

/// A running scripted motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub handle: EntityHandle,
    pub start: Vec3,
    pub motion: MotionSpec,
    pub elapsed: f32,
    pub duration: f32,
    pub on_complete: OnComplete,
}

impl ScriptedAction {
    /// Completed fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Linearly interpolated position
    pub fn position(&self) -> Vec3 {
        self.start + self.motion.translation.displacement(self.start) * self.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Running motions, kept in start order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionTracker {
    actions: Vec<ScriptedAction>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a motion. A new motion on the same entity replaces the
    /// previous one.
    pub fn start(
        &mut self,
        handle: EntityHandle,
        start: Vec3,
        motion: MotionSpec,
        duration: f32,
        on_complete: OnComplete,
    ) {
        self.cancel(handle);
        self.actions.push(ScriptedAction {
            handle,
            start,
            motion,
            elapsed: 0.0,
            duration,
            on_complete,
        });
    }

    /// Advance every motion by `dt` and return the ones that finished
    pub fn advance(&mut self, dt: f32) -> Vec<ScriptedAction> {
        let mut finished = Vec::new();
        self.actions.retain_mut(|action| {
            action.elapsed += dt;
            if action.is_finished() {
                finished.push(*action);
                false
            } else {
                true
            }
        });
        finished
    }

    /// Stop tracking an entity (it was destroyed by a game rule)
    pub fn cancel(&mut self, handle: EntityHandle) -> Option<ScriptedAction> {
        let idx = self.actions.iter().position(|a| a.handle == handle)?;
        Some(self.actions.remove(idx))
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&ScriptedAction> {
        self.actions.iter().find(|a| a.handle == handle)
    }

    /// Current position of an animated entity
    pub fn position_of(&self, handle: EntityHandle) -> Option<Vec3> {
        self.get(handle).map(ScriptedAction::position)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolated_position() {
        let mut tracker = ActionTracker::new();
        let h = EntityHandle(3);
        tracker.start(
            h,
            Vec3::new(2.0, 0.0, -150.0),
            MotionSpec::move_to(Vec3::new(2.0, 0.0, 50.0)),
            4.0,
            OnComplete::Remove,
        );
        tracker.advance(1.0);
        assert_eq!(tracker.position_of(h), Some(Vec3::new(2.0, 0.0, -100.0)));
    }

    #[test]
    fn test_finished_actions_are_returned_once() {
        let mut tracker = ActionTracker::new();
        tracker.start(
            EntityHandle(1),
            Vec3::ZERO,
            MotionSpec::move_by(Vec3::new(0.0, 0.0, -150.0)),
            1.5,
            OnComplete::Remove,
        );
        tracker.start(
            EntityHandle(2),
            Vec3::ZERO,
            MotionSpec::move_by(Vec3::X),
            3.0,
            OnComplete::Remove,
        );
        assert!(tracker.advance(1.0).is_empty());
        let done = tracker.advance(0.5);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].handle, EntityHandle(1));
        assert_eq!(done[0].position(), Vec3::new(0.0, 0.0, -150.0));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.advance(0.1).is_empty());
    }

    #[test]
    fn test_cancel_stops_tracking() {
        let mut tracker = ActionTracker::new();
        tracker.start(
            EntityHandle(9),
            Vec3::ZERO,
            MotionSpec::move_by(Vec3::ONE),
            1.0,
            OnComplete::Keep,
        );
        assert!(tracker.cancel(EntityHandle(9)).is_some());
        assert!(tracker.cancel(EntityHandle(9)).is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_restart_replaces_motion() {
        let mut tracker = ActionTracker::new();
        let h = EntityHandle(5);
        tracker.start(h, Vec3::ZERO, MotionSpec::move_by(Vec3::X), 1.0, OnComplete::Keep);
        tracker.start(h, Vec3::ZERO, MotionSpec::move_by(Vec3::Y), 2.0, OnComplete::Keep);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get(h).unwrap().duration, 2.0);
    }
}
