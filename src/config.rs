use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const APP_DIR_NAME: &str = "dungeon_scribe";

/// Endpoints and credentials. Read from `config.json` in the app config
/// directory, then overridden by environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub image: ImageConfig,
    pub speech: SpeechConfig,
    /// Root for per-session narration directories.
    pub audio_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// OpenAI-compatible base URL, e.g. LM Studio's `http://localhost:1234/v1`.
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".into(),
            model: "gpt2".into(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub endpoint: String,
    /// Bearer token for the inference API.
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/runwayml/stable-diffusion-v1-5"
                .into(),
            token: String::new(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".into(),
            language: "en".into(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Loads `<config dir>/dungeon_scribe/config.json` (defaults when absent)
    /// and applies `DUNGEON_*` / `HF_TOKEN` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_dir().join("config.json");
        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("DUNGEON_MODEL_URL") {
            self.model.base_url = v;
        }
        if let Some(v) = var("DUNGEON_MODEL_NAME") {
            self.model.model = v;
        }
        if let Some(v) = var("DUNGEON_IMAGE_URL") {
            self.image.endpoint = v;
        }
        if let Some(v) = var("HF_TOKEN") {
            self.image.token = v;
        }
        if let Some(v) = var("DUNGEON_TTS_URL") {
            self.speech.endpoint = v;
        }
        if let Some(v) = var("DUNGEON_TTS_LANG") {
            self.speech.language = v;
        }
        if let Some(v) = var("DUNGEON_AUDIO_DIR") {
            self.audio_dir = Some(PathBuf::from(v));
        }

        if self.image.token.is_empty() {
            warn!("HF_TOKEN not set; illustration requests will likely be rejected");
        }
    }

    pub fn audio_root(&self) -> PathBuf {
        self.audio_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME).join("audio"))
    }
}

/// Per-user config directory for this app, created if missing.
pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR_NAME);
    if let Err(e) = fs::create_dir_all(&path) {
        warn!("could not create {}: {e}", path.display());
    }
    path
}
