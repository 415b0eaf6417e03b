//! Gameplay simulation module
//!
//! All gameplay decisions live here. This module must stay engine-agnostic:
//! - Frame time comes from the host clock
//! - Randomness comes from an injected (seedable) RNG
//! - Scene changes go through the `Presentation` trait only

pub mod actions;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actions::{ActionTracker, OnComplete, ScriptedAction};
pub use collision::{EntityKind, Outcome, resolve, resolve_categories};
pub use spawn::{SpawnEvent, SpawnTimer};
pub use state::{
    DestroyReason, GamePhase, HitCounter, Lifecycle, Obstacle, PlayfieldBounds, Projectile,
    Steering,
};
pub use tick::{Contact, FrameSummary, GameController, GameState, Inbound, InboundQueue};
