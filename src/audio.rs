//! Sound effect ids
//!
//! Mixing and playback belong to the host; the core only picks which effect
//! fires and hands the configured file name to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::settings::AssetNames;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Obstacle shot down
    Explosion,
}

impl SoundEffect {
    /// Audio file configured for this effect
    pub fn file_name<'a>(&self, assets: &'a AssetNames) -> &'a str {
        match self {
            SoundEffect::Explosion => &assets.explosion_sound,
        }
    }
}
