//! Per-frame gameplay controller
//!
//! The host drives the controller with three kinds of inbound events (device
//! motion, taps, physics contacts) plus one clock callback per rendered frame.
//! Contacts are resolved before the frame's movement integration.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actions::{ActionTracker, OnComplete};
use super::collision::{CATEGORY_OBSTACLE, EntityKind, Outcome, resolve_categories};
use super::spawn::{SpawnEvent, SpawnTimer};
use super::state::{
    DestroyReason, GamePhase, HitCounter, Lifecycle, Obstacle, PlayfieldBounds, Projectile,
    Steering,
};
use crate::audio::SoundEffect;
use crate::error::GameError;
use crate::presentation::{Anchor, EntityHandle, MotionSpec, Presentation};
use crate::settings::Settings;

/// One side of a physics contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub handle: EntityHandle,
    /// Category bitmask of the body as reported by the physics engine
    pub category: u32,
}

impl Contact {
    pub fn new(handle: EntityHandle, kind: EntityKind) -> Self {
        Self {
            handle,
            category: kind.category(),
        }
    }
}

/// Inbound host events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inbound {
    /// Device attitude sample (radians)
    Motion { roll: f32, pitch: f32 },
    /// Screen tapped
    Tap,
    /// Two bodies began touching
    Contact(Contact, Contact),
}

/// Single-consumer queue for hosts that deliver events off the frame thread.
///
/// Producers clone the sender; the controller drains everything once per frame.
pub struct InboundQueue {
    tx: Sender<Inbound>,
    rx: Receiver<Inbound>,
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InboundQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Inbound> {
        self.tx.clone()
    }

    pub fn push(&self, event: Inbound) {
        // The receiver lives as long as self, so send cannot fail here
        let _ = self.tx.send(event);
    }
}

/// What a frame did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub dt: f32,
    pub spawned: Option<EntityHandle>,
    /// Entities removed because their motion finished
    pub expired: Vec<(EntityHandle, EntityKind)>,
}

/// Gameplay state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub bounds: PlayfieldBounds,
    pub steering: Steering,
    pub spawn: SpawnTimer,
    pub hits: HitCounter,
    pub phase: GamePhase,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live projectiles in fire order
    pub projectiles: Vec<Projectile>,
    pub actions: ActionTracker,
    /// Camera node steered by tilt
    pub camera: Anchor,
    /// Dragon node; `None` once destroyed
    pub player: Option<EntityHandle>,
    /// Dragon position at scene load
    pub player_base: Vec3,
    pub previous_time: Option<f64>,
    pub frame_count: u64,
}

impl GameState {
    fn new(camera: Anchor, player: Anchor, settings: &Settings) -> Self {
        Self {
            bounds: PlayfieldBounds::ZERO,
            steering: Steering::new(camera.position.x, camera.euler, settings),
            spawn: SpawnTimer::new(settings.spawn_interval, settings.obstacle_max_spin),
            hits: HitCounter::default(),
            phase: GamePhase::Playing,
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            actions: ActionTracker::new(),
            camera,
            player: Some(player.handle),
            player_base: player.position,
            previous_time: None,
            frame_count: 0,
        }
    }

    /// Camera position with the steered lateral offset
    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(
            self.steering.position,
            self.camera.position.y,
            self.camera.position.z,
        )
    }

    /// Dragon position; follows the camera laterally
    pub fn player_position(&self) -> Vec3 {
        self.player_base + Vec3::X * (self.steering.position - self.camera.position.x)
    }
}

/// Drives one game screen against a host presentation layer
pub struct GameController<P: Presentation, R: Rng = Pcg32> {
    state: GameState,
    settings: Settings,
    presentation: P,
    rng: R,
}

impl<P: Presentation> GameController<P, Pcg32> {
    /// Controller with a seeded PCG generator
    pub fn with_seed(presentation: P, settings: Settings, seed: u64) -> Result<Self, GameError> {
        Self::new(presentation, settings, Pcg32::seed_from_u64(seed))
    }
}

impl<P: Presentation, R: Rng> GameController<P, R> {
    /// Resolve scene anchors and prepare assets.
    ///
    /// Fails if the camera or dragon node is missing from the scene.
    pub fn new(mut presentation: P, settings: Settings, rng: R) -> Result<Self, GameError> {
        settings.validate()?;

        let camera = presentation
            .find_anchor(&settings.assets.camera_node)
            .ok_or_else(|| GameError::MissingAnchor(settings.assets.camera_node.clone()))?;
        let player = presentation
            .find_anchor(&settings.assets.player_node)
            .ok_or_else(|| GameError::MissingAnchor(settings.assets.player_node.clone()))?;

        presentation.prepare_model(&settings.assets.ice_ball);

        let state = GameState::new(camera, player, &settings);
        presentation.set_label_text(&state.hits.label());

        log::info!(
            "Game screen ready (camera {:?}, dragon {:?})",
            camera.handle,
            player.handle
        );

        Ok(Self {
            state,
            settings,
            presentation,
            rng,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn hits(&self) -> u32 {
        self.state.hits.count()
    }

    /// Measure the playfield from the viewport's unprojected half width
    pub fn set_viewport(&mut self, half_width: f32) -> Result<PlayfieldBounds, GameError> {
        let bounds = PlayfieldBounds::from_half_width(half_width, &self.settings)?;
        self.set_bounds(bounds)?;
        Ok(bounds)
    }

    /// Replace the playfield. Rejects bounds the spawner cannot sample from.
    pub fn set_bounds(&mut self, bounds: PlayfieldBounds) -> Result<(), GameError> {
        let bounds = bounds.validated()?;
        log::info!(
            "Playfield x [{}, {}] z [{}, {}]",
            bounds.min_x,
            bounds.max_x,
            bounds.min_z,
            bounds.max_z
        );
        self.state.bounds = bounds;
        Ok(())
    }

    /// Device motion sample. Only overwrites the steering velocity and the
    /// cosmetic camera angles; never blocks.
    pub fn sample_input(&mut self, roll: f32, pitch: f32) {
        self.state.steering.sample_input(roll, pitch);
        self.pose_camera();
    }

    /// Tap: fire a projectile from the dragon.
    ///
    /// Returns `None` when the dragon has been destroyed.
    pub fn fire(&mut self) -> Option<EntityHandle> {
        log::debug!("Screen tapped");
        if self.state.player.is_none() {
            log::warn!("Dragon not in scene; shot ignored");
            return None;
        }

        let origin = self.state.player_position();
        let handle = self
            .presentation
            .spawn_entity(EntityKind::Projectile, origin);
        let motion = MotionSpec::move_by(self.settings.projectile_travel);
        let duration = self.settings.projectile_flight_time;
        self.presentation.animate(handle, &motion, duration);
        self.state
            .actions
            .start(handle, origin, motion, duration, OnComplete::Remove);
        self.state.projectiles.push(Projectile {
            handle,
            spawn: origin,
            lifecycle: Lifecycle::Spawned,
        });
        Some(handle)
    }

    /// Physics contact callback
    pub fn on_contact(&mut self, a: Contact, b: Contact) -> Outcome {
        match resolve_categories(a.category, b.category) {
            Outcome::DestroyObstacle => {
                let (obstacle, projectile) = if a.category == CATEGORY_OBSTACLE {
                    (a.handle, b.handle)
                } else {
                    (b.handle, a.handle)
                };
                self.destroy_obstacle(obstacle, projectile)
            }
            Outcome::DestroyPlayer => {
                let obstacle = if a.category == CATEGORY_OBSTACLE {
                    a.handle
                } else {
                    b.handle
                };
                if !self.is_live_obstacle(obstacle) {
                    log::debug!("Dragon contact with stale obstacle {:?} ignored", obstacle);
                    return Outcome::Ignore;
                }
                self.destroy_player();
                Outcome::DestroyPlayer
            }
            Outcome::Ignore => {
                log::debug!(
                    "Ignoring contact {:?}/{:#05b} with {:?}/{:#05b}",
                    a.handle,
                    a.category,
                    b.handle,
                    b.category
                );
                Outcome::Ignore
            }
        }
    }

    /// Apply every queued event in arrival order
    pub fn pump(&mut self, queue: &InboundQueue) -> usize {
        let mut handled = 0;
        for event in queue.rx.try_iter() {
            match event {
                Inbound::Motion { roll, pitch } => self.sample_input(roll, pitch),
                Inbound::Tap => {
                    self.fire();
                }
                Inbound::Contact(a, b) => {
                    self.on_contact(a, b);
                }
            }
            handled += 1;
        }
        handled
    }

    /// Drain the queue, then advance the frame
    pub fn run_frame(
        &mut self,
        current_time: f64,
        queue: &InboundQueue,
    ) -> Result<FrameSummary, GameError> {
        self.pump(queue);
        self.frame_update(current_time)
    }

    /// Clock callback, once per rendered frame
    pub fn frame_update(&mut self, current_time: f64) -> Result<FrameSummary, GameError> {
        if self.state.bounds.is_zero() {
            return Err(GameError::BoundsNotInitialized);
        }

        let dt = match self.state.previous_time {
            Some(previous) => (current_time - previous).max(0.0) as f32,
            None => 0.0,
        };
        self.state.previous_time = Some(current_time);
        self.state.frame_count += 1;

        let mut summary = FrameSummary {
            dt,
            ..Default::default()
        };

        // Scripted motions
        for obstacle in &mut self.state.obstacles {
            obstacle.lifecycle = Lifecycle::InFlight;
        }
        for projectile in &mut self.state.projectiles {
            projectile.lifecycle = Lifecycle::InFlight;
        }
        for finished in self.state.actions.advance(dt) {
            if finished.on_complete == OnComplete::Keep {
                continue;
            }
            if let Some(kind) = self.forget(finished.handle, DestroyReason::ReachedDestination) {
                summary.expired.push((finished.handle, kind));
            }
            self.presentation.destroy_entity(finished.handle);
        }

        // Steering
        let bounds = self.state.bounds;
        self.state.steering.update(dt, &bounds);
        self.pose_camera();
        log::trace!("Dragon position: {}", self.state.player_position());

        // Spawning
        if let Some(event) = self.state.spawn.update(dt, &bounds, &mut self.rng) {
            summary.spawned = Some(self.spawn_obstacle(event));
        }

        Ok(summary)
    }

    fn spawn_obstacle(&mut self, event: SpawnEvent) -> EntityHandle {
        let position = event.position;
        let handle = self
            .presentation
            .spawn_entity(EntityKind::Obstacle, position);
        let target = Vec3::new(position.x, 0.0, self.state.bounds.max_z);
        let motion = MotionSpec::move_to(target).with_spin(event.spin);
        let duration = self.settings.obstacle_flight_time;
        self.presentation.animate(handle, &motion, duration);
        self.state
            .actions
            .start(handle, position, motion, duration, OnComplete::Remove);
        self.state.obstacles.push(Obstacle {
            handle,
            spawn: position,
            lifecycle: Lifecycle::Spawned,
        });
        log::debug!("Ice ball spawned at {}", position);
        handle
    }

    fn destroy_obstacle(&mut self, obstacle: EntityHandle, projectile: EntityHandle) -> Outcome {
        let Some(spawn) = self
            .state
            .obstacles
            .iter()
            .find(|o| o.handle == obstacle)
            .map(|o| o.spawn)
        else {
            log::debug!("Contact with stale obstacle {:?} ignored", obstacle);
            return Outcome::Ignore;
        };
        if !self.state.projectiles.iter().any(|p| p.handle == projectile) {
            log::debug!("Contact with stale projectile {:?} ignored", projectile);
            return Outcome::Ignore;
        }

        let at = self
            .state
            .actions
            .position_of(obstacle)
            .unwrap_or(spawn);

        self.forget(obstacle, DestroyReason::Collision);
        self.presentation.destroy_entity(obstacle);
        self.forget(projectile, DestroyReason::Collision);
        self.presentation.destroy_entity(projectile);

        let hits = self.state.hits.increment();
        log::info!("Ice ball destroyed at {} ({} hits)", at, hits);
        self.presentation.set_label_text(&self.state.hits.label());

        let assets = &self.settings.assets;
        self.presentation
            .show_particles(&assets.explosion_particles, at);
        self.presentation
            .play_sound(SoundEffect::Explosion.file_name(assets));

        Outcome::DestroyObstacle
    }

    fn destroy_player(&mut self) {
        let Some(player) = self.state.player.take() else {
            log::debug!("Dragon already destroyed; repeat contact ignored");
            return;
        };

        log::warn!("Dragon hit by an ice ball");
        self.presentation.destroy_entity(player);
        self.state.phase = GamePhase::PlayerDestroyed;

        let camera = self.state.camera.handle;
        let motion = MotionSpec::move_by(self.settings.recoil_offset)
            .with_spin(self.settings.recoil_spin);
        let duration = self.settings.recoil_duration;
        self.presentation.animate(camera, &motion, duration);
        self.state.actions.start(
            camera,
            self.state.camera_position(),
            motion,
            duration,
            OnComplete::Keep,
        );
    }

    fn is_live_obstacle(&self, handle: EntityHandle) -> bool {
        self.state.obstacles.iter().any(|o| o.handle == handle)
    }

    /// Drop a gameplay entity from tracking, returning its kind if it was live
    fn forget(&mut self, handle: EntityHandle, reason: DestroyReason) -> Option<EntityKind> {
        self.state.actions.cancel(handle);
        if let Some(idx) = self.state.obstacles.iter().position(|o| o.handle == handle) {
            self.state.obstacles.remove(idx);
            log::trace!("Obstacle {:?} removed ({:?})", handle, reason);
            return Some(EntityKind::Obstacle);
        }
        if let Some(idx) = self.state.projectiles.iter().position(|p| p.handle == handle) {
            self.state.projectiles.remove(idx);
            log::trace!("Projectile {:?} removed ({:?})", handle, reason);
            return Some(EntityKind::Projectile);
        }
        None
    }

    /// Push the steered camera pose. Once the dragon is gone the camera
    /// belongs to the recoil animation.
    fn pose_camera(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        let position = self.state.camera_position();
        self.presentation
            .set_pose(self.state.camera.handle, position, self.state.steering.euler);
    }
}
