use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::config::config_dir;
use crate::ui::settings::UiSettings;

fn settings_path() -> PathBuf {
    config_dir().join("ui_settings.json")
}

pub fn load_settings() -> UiSettings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &UiSettings) {
    save_settings_to(&settings_path(), settings);
}

pub fn load_settings_from(path: &Path) -> UiSettings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_settings_to(path: &Path, settings: &UiSettings) {
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                warn!("could not save settings to {}: {e}", path.display());
            }
        }
        Err(e) => warn!("could not serialize settings: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::genre::Genre;

    #[test]
    fn saved_story_settings_come_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");

        let mut settings = UiSettings::default();
        settings.story.genre = Genre::Cyberpunk;
        settings.story.character_name = "Kei".into();
        settings.story.enable_voice = false;
        save_settings_to(&path, &settings);

        let loaded = load_settings_from(&path);
        assert!(loaded == settings);
    }

    #[test]
    fn broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(load_settings_from(&path) == UiSettings::default());
    }
}
