use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::story_settings::StorySettings;

/// Everything the window remembers between runs.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    // Role → color mapping for story cards
    pub colors: HashMap<String, [u8; 4]>,

    pub story: StorySettings,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut colors = HashMap::new();

        colors.insert("Player".into(), [162, 155, 254, 255]);
        colors.insert("Story".into(), [223, 230, 233, 255]);
        colors.insert("Card".into(), [38, 40, 52, 255]);
        colors.insert("Title".into(), [108, 92, 231, 255]);

        Self {
            ui_scale: 1.0,
            colors,
            story: StorySettings::default(),
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }
}
