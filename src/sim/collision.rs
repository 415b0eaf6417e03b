//! Contact resolution
//!
//! The host physics engine detects geometric contact between category-tagged
//! bodies and reports each new pair. This module only decides what that pair
//! means for gameplay; it never moves or inspects bodies.

use serde::{Deserialize, Serialize};

/// Physics category bitmasks
pub const CATEGORY_PLAYER: u32 = 0b001;
pub const CATEGORY_PROJECTILE: u32 = 0b010;
pub const CATEGORY_OBSTACLE: u32 = 0b100;

/// Gameplay entity kinds known to the physics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The dragon
    Player,
    /// Shot fired on tap
    Projectile,
    /// Falling ice ball
    Obstacle,
}

impl EntityKind {
    /// Physics category bitmask for this kind
    pub const fn category(self) -> u32 {
        match self {
            EntityKind::Player => CATEGORY_PLAYER,
            EntityKind::Projectile => CATEGORY_PROJECTILE,
            EntityKind::Obstacle => CATEGORY_OBSTACLE,
        }
    }

    /// Map a body's category bitmask back to a kind (exact match only)
    pub fn from_category(mask: u32) -> Option<Self> {
        match mask {
            CATEGORY_PLAYER => Some(EntityKind::Player),
            CATEGORY_PROJECTILE => Some(EntityKind::Projectile),
            CATEGORY_OBSTACLE => Some(EntityKind::Obstacle),
            _ => None,
        }
    }
}

/// Decision for a contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// An obstacle reached the dragon
    DestroyPlayer,
    /// A projectile hit an obstacle
    DestroyObstacle,
    /// Anything else (projectile vs projectile, unknown bodies, ...)
    Ignore,
}

/// Resolve a contact between two known kinds. Argument order does not matter.
pub fn resolve(a: EntityKind, b: EntityKind) -> Outcome {
    use EntityKind::*;
    match (a, b) {
        (Obstacle, Player) | (Player, Obstacle) => Outcome::DestroyPlayer,
        (Obstacle, Projectile) | (Projectile, Obstacle) => Outcome::DestroyObstacle,
        _ => Outcome::Ignore,
    }
}

/// Resolve a contact from raw category bitmasks.
///
/// Unrecognised categories are contact noise from the host and resolve to
/// `Outcome::Ignore`.
pub fn resolve_categories(a: u32, b: u32) -> Outcome {
    match (EntityKind::from_category(a), EntityKind::from_category(b)) {
        (Some(a), Some(b)) => resolve(a, b),
        _ => Outcome::Ignore,
    }
}
