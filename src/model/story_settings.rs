use serde::{Deserialize, Serialize};

use crate::model::genre::Genre;

pub const MIN_CREATIVITY: f32 = 0.1;
pub const MAX_CREATIVITY: f32 = 1.0;

/// Sidebar choices that shape the next turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorySettings {
    pub genre: Genre,
    pub character_name: String,
    /// Shown on the character profile only; the prompt does not use it.
    pub inventory: String,
    pub enable_voice: bool,
    pub enable_image: bool,
    /// Sampling temperature, 0.1..=1.0.
    pub creativity: f32,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            genre: Genre::Fantasy,
            character_name: "Arthur".into(),
            inventory: "Sword, Map, Potion".into(),
            enable_voice: true,
            enable_image: true,
            creativity: 0.6,
        }
    }
}

impl StorySettings {
    pub fn clamped_creativity(&self) -> f32 {
        if self.creativity.is_nan() {
            return Self::default().creativity;
        }
        self.creativity.clamp(MIN_CREATIVITY, MAX_CREATIVITY)
    }
}
