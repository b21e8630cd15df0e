use std::time::Duration;

use log::{info, warn};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::ImageConfig;
use crate::model::genre::Genre;
use crate::model::turn::{Illustration, MediaOutcome};

const PROMPT_EXCERPT_CHARS: usize = 80;

/// Something that can paint a picture for a prompt.
pub trait Illustrator: Send {
    fn illustrate(&self, prompt: &str) -> MediaOutcome<Illustration>;
}

pub fn image_prompt(narrative: &str, genre: &Genre) -> String {
    let excerpt: String = narrative.chars().take(PROMPT_EXCERPT_CHARS).collect();
    format!(
        "{}, {excerpt}, centered composition, highly detailed",
        genre.illustration_style()
    )
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Text-to-image over a hosted inference endpoint. One attempt, no retry.
pub struct InferenceApiIllustrator {
    client: Option<Client>,
    endpoint: String,
    token: String,
}

impl InferenceApiIllustrator {
    pub fn new(config: &ImageConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| warn!("image client unavailable: {e}"))
            .ok();

        Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        }
    }
}

impl Illustrator for InferenceApiIllustrator {
    fn illustrate(&self, prompt: &str) -> MediaOutcome<Illustration> {
        let Some(client) = &self.client else {
            return MediaOutcome::Failed {
                reason: "image client unavailable".into(),
            };
        };

        let resp = match client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&InferenceRequest { inputs: prompt })
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                warn!("illustration request failed: {e}");
                return MediaOutcome::Failed {
                    reason: "image service unreachable".into(),
                };
            }
        };

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            warn!("illustration request rejected: HTTP {}", status.as_u16());
            return MediaOutcome::Failed {
                reason: format!("image service answered HTTP {}", status.as_u16()),
            };
        }

        match resp.bytes() {
            Ok(bytes) => decode_illustration(&bytes),
            Err(e) => {
                warn!("illustration body unreadable: {e}");
                MediaOutcome::Failed {
                    reason: "image download interrupted".into(),
                }
            }
        }
    }
}

pub fn decode_illustration(bytes: &[u8]) -> MediaOutcome<Illustration> {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            info!("illustration ready ({}x{})", rgba.width(), rgba.height());
            MediaOutcome::Ready(Illustration {
                width: rgba.width(),
                height: rgba.height(),
                rgba: rgba.into_raw(),
            })
        }
        Err(e) => {
            warn!("illustration could not be decoded: {e}");
            MediaOutcome::Failed {
                reason: "image service returned an unreadable image".into(),
            }
        }
    }
}
