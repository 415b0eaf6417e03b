//! Presentation collaborator
//!
//! Everything visible or audible goes through [`Presentation`]: spawning and
//! removing scene entities, scripted motion, particles, sounds and the HUD
//! label. The gameplay core holds only the opaque [`EntityHandle`]s it gets
//! back and never touches the host scene graph directly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::collision::EntityKind;

/// Opaque identifier of an entity in the host scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

/// A named scene node resolved at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub handle: EntityHandle,
    pub position: Vec3,
    /// Orientation as euler angles (x = pitch, y = yaw, z = roll)
    pub euler: Vec3,
}

/// Translation part of a scripted motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Translation {
    /// Relative move
    By(Vec3),
    /// Absolute destination
    To(Vec3),
}

impl Translation {
    /// Displacement this translation applies from `start`
    pub fn displacement(&self, start: Vec3) -> Vec3 {
        match *self {
            Translation::By(delta) => delta,
            Translation::To(target) => target - start,
        }
    }
}

/// A scripted motion run by the host's action system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSpec {
    pub translation: Translation,
    /// Rotation applied over the motion (radians per axis)
    pub spin: Vec3,
}

impl MotionSpec {
    pub fn move_by(delta: Vec3) -> Self {
        Self {
            translation: Translation::By(delta),
            spin: Vec3::ZERO,
        }
    }

    pub fn move_to(target: Vec3) -> Self {
        Self {
            translation: Translation::To(target),
            spin: Vec3::ZERO,
        }
    }

    pub fn with_spin(mut self, spin: Vec3) -> Self {
        self.spin = spin;
        self
    }
}

/// Commands the core issues to the host
pub trait Presentation {
    /// Look up a named node in the loaded scene
    fn find_anchor(&self, name: &str) -> Option<Anchor>;

    /// Warm up a model so the first spawn doesn't hitch
    fn prepare_model(&mut self, _asset: &str) {}

    fn spawn_entity(&mut self, kind: EntityKind, position: Vec3) -> EntityHandle;

    fn destroy_entity(&mut self, handle: EntityHandle);

    /// Start a scripted motion. Removal on completion is driven by the core.
    fn animate(&mut self, handle: EntityHandle, motion: &MotionSpec, duration: f32);

    /// Place an entity directly (camera steering)
    fn set_pose(&mut self, handle: EntityHandle, position: Vec3, euler: Vec3);

    fn play_sound(&mut self, file: &str);

    fn show_particles(&mut self, system: &str, at: Vec3);

    fn set_label_text(&mut self, text: &str);
}

/// A command as recorded by [`RecordingPresentation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Prepare(String),
    Spawn {
        handle: EntityHandle,
        kind: EntityKind,
        position: Vec3,
    },
    Destroy(EntityHandle),
    Animate {
        handle: EntityHandle,
        motion: MotionSpec,
        duration: f32,
    },
    SetPose {
        handle: EntityHandle,
        position: Vec3,
        euler: Vec3,
    },
    PlaySound(String),
    ShowParticles {
        system: String,
        at: Vec3,
    },
    SetLabel(String),
}

/// Headless presentation that records every command.
///
/// Used by the demo binary and tests in place of a real scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingPresentation {
    anchors: Vec<(String, Anchor)>,
    commands: Vec<Command>,
    live: Vec<EntityHandle>,
    next_handle: u32,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Default::default()
        }
    }

    /// A scene with `camera` and `dragon` nodes, as the shipped asset has
    pub fn with_default_scene() -> Self {
        let mut scene = Self::new();
        scene.add_anchor("camera", Vec3::new(0.0, 15.0, 30.0), Vec3::new(-0.4, 0.0, 0.0));
        scene.add_anchor("dragon", Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
        scene
    }

    /// Register a named scene node
    pub fn add_anchor(&mut self, name: &str, position: Vec3, euler: Vec3) -> EntityHandle {
        let handle = self.allocate();
        self.anchors.push((
            name.to_string(),
            Anchor {
                handle,
                position,
                euler,
            },
        ));
        self.live.push(handle);
        handle
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drain recorded commands
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Whether the entity is still in the scene
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Most recent HUD label text
    pub fn label(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetLabel(text) => Some(text.as_str()),
            _ => None,
        })
    }

    fn allocate(&mut self) -> EntityHandle {
        let handle = EntityHandle(self.next_handle.max(1));
        self.next_handle = handle.0 + 1;
        handle
    }

    fn record(&mut self, command: Command) {
        log::trace!("{:?}", command);
        self.commands.push(command);
    }
}

impl Presentation for RecordingPresentation {
    fn find_anchor(&self, name: &str) -> Option<Anchor> {
        self.anchors
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, anchor)| *anchor)
    }

    fn prepare_model(&mut self, asset: &str) {
        self.record(Command::Prepare(asset.to_string()));
    }

    fn spawn_entity(&mut self, kind: EntityKind, position: Vec3) -> EntityHandle {
        let handle = self.allocate();
        self.live.push(handle);
        self.record(Command::Spawn {
            handle,
            kind,
            position,
        });
        handle
    }

    fn destroy_entity(&mut self, handle: EntityHandle) {
        self.live.retain(|h| *h != handle);
        self.record(Command::Destroy(handle));
    }

    fn animate(&mut self, handle: EntityHandle, motion: &MotionSpec, duration: f32) {
        self.record(Command::Animate {
            handle,
            motion: *motion,
            duration,
        });
    }

    fn set_pose(&mut self, handle: EntityHandle, position: Vec3, euler: Vec3) {
        self.record(Command::SetPose {
            handle,
            position,
            euler,
        });
    }

    fn play_sound(&mut self, file: &str) {
        self.record(Command::PlaySound(file.to_string()));
    }

    fn show_particles(&mut self, system: &str, at: Vec3) {
        self.record(Command::ShowParticles {
            system: system.to_string(),
            at,
        });
    }

    fn set_label_text(&mut self, text: &str) {
        self.record(Command::SetLabel(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_displacement() {
        let start = Vec3::new(1.0, 0.0, -150.0);
        assert_eq!(
            Translation::To(Vec3::new(1.0, 0.0, 50.0)).displacement(start),
            Vec3::new(0.0, 0.0, 200.0)
        );
        assert_eq!(
            Translation::By(Vec3::new(0.0, 0.0, -150.0)).displacement(start),
            Vec3::new(0.0, 0.0, -150.0)
        );
    }

    #[test]
    fn test_recording_tracks_live_entities() {
        let mut scene = RecordingPresentation::new();
        let a = scene.spawn_entity(EntityKind::Obstacle, Vec3::ZERO);
        let b = scene.spawn_entity(EntityKind::Projectile, Vec3::ONE);
        assert_ne!(a, b);
        assert!(scene.is_live(a));
        scene.destroy_entity(a);
        assert!(!scene.is_live(a));
        assert!(scene.is_live(b));
        assert_eq!(scene.commands().len(), 3);
    }

    #[test]
    fn test_default_scene_anchors() {
        let scene = RecordingPresentation::with_default_scene();
        let camera = scene.find_anchor("camera").unwrap();
        let dragon = scene.find_anchor("dragon").unwrap();
        assert_ne!(camera.handle, dragon.handle);
        assert!(scene.find_anchor("missing").is_none());
    }

    #[test]
    fn test_label_returns_latest() {
        let mut scene = RecordingPresentation::new();
        assert_eq!(scene.label(), None);
        scene.set_label_text("0 HITS");
        scene.set_label_text("1 HITS");
        assert_eq!(scene.label(), Some("1 HITS"));
    }
}
