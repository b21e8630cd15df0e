use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::Url;
use thiserror::Error;

use crate::config::SpeechConfig;
use crate::model::turn::{MediaOutcome, Narration};

/// Text this short is not worth narrating.
const MIN_NARRATION_CHARS: usize = 5;
/// The translate TTS endpoint refuses longer requests.
const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("invalid speech endpoint {0}")]
    Endpoint(String),
    #[error("speech client unavailable")]
    Unavailable,
    #[error("speech request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("speech service answered HTTP {0}")]
    Status(u16),
}

/// Turns text into MP3 bytes.
pub trait SpeechSynthesizer: Send {
    fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Google Translate's public TTS endpoint, fetched chunk by chunk.
///
/// A client that failed to build leaves every turn without narration.
pub struct TranslateTts {
    client: Option<Client>,
    endpoint: String,
}

impl TranslateTts {
    pub fn new(config: &SpeechConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| warn!("speech client unavailable: {e}"))
            .ok();

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    fn chunk_url(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Result<Url, SpeechError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let len = chunk.chars().count().to_string();
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", len.as_str()),
            ],
        )
        .map_err(|_| SpeechError::Endpoint(self.endpoint.clone()))
    }
}

impl SpeechSynthesizer for TranslateTts {
    fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SpeechError> {
        let client = self.client.as_ref().ok_or(SpeechError::Unavailable)?;
        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, language, idx, chunks.len())?;
            debug!("tts chunk {}/{}", idx + 1, chunks.len());

            let resp = client.get(url).send()?;
            if !resp.status().is_success() {
                return Err(SpeechError::Status(resp.status().as_u16()));
            }
            audio.extend_from_slice(&resp.bytes()?);
        }

        Ok(audio)
    }
}

/// Splits text on whitespace into pieces of at most `max_chars` characters.
/// Words longer than the limit are cut.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() { word.len() } else { word.len() + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Writes narration for one turn to `path`.
pub fn narrate(
    synth: &dyn SpeechSynthesizer,
    text: &str,
    language: &str,
    path: &Path,
) -> MediaOutcome<Narration> {
    if text.chars().count() <= MIN_NARRATION_CHARS {
        return MediaOutcome::Skipped {
            reason: "text too short to narrate".into(),
        };
    }

    let audio = match synth.synthesize(text, language) {
        Ok(a) if a.is_empty() => {
            warn!("speech service returned no audio");
            return MediaOutcome::Failed {
                reason: "speech service returned no audio".into(),
            };
        }
        Ok(a) => a,
        Err(e) => {
            warn!("narration failed: {e}");
            return MediaOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("could not create {}: {e}", dir.display());
            return MediaOutcome::Failed {
                reason: "could not save narration".into(),
            };
        }
    }
    if let Err(e) = fs::write(path, &audio) {
        warn!("could not write {}: {e}", path.display());
        return MediaOutcome::Failed {
            reason: "could not save narration".into(),
        };
    }

    info!("narration saved to {} ({} bytes)", path.display(), audio.len());
    MediaOutcome::Ready(Narration {
        path: path.to_path_buf(),
    })
}
