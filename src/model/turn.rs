use std::path::PathBuf;

/// Result of a best-effort media step.
///
/// Keeps "not requested" apart from "requested but failed" so the feed can
/// tell the player why a turn has no picture or audio.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaOutcome<T> {
    Ready(T),
    /// The sidebar toggle was off.
    Disabled,
    /// The step was not attempted for this text.
    Skipped { reason: String },
    Failed { reason: String },
}

impl<T> MediaOutcome<T> {
    pub fn artifact(&self) -> Option<&T> {
        match self {
            MediaOutcome::Ready(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, MediaOutcome::Ready(_))
    }

    /// Short human readable note for anything but `Ready` / `Disabled`.
    pub fn note(&self) -> Option<&str> {
        match self {
            MediaOutcome::Skipped { reason } | MediaOutcome::Failed { reason } => {
                Some(reason.as_str())
            }
            _ => None,
        }
    }
}

/// Decoded illustration, ready to be uploaded as a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Illustration {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    pub path: PathBuf,
}

/// One player action and everything generated for it.
///
/// Fields are private so a turn cannot be edited once it is in a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    player_action: String,
    narrative: String,
    illustration: MediaOutcome<Illustration>,
    narration: MediaOutcome<Narration>,
}

impl Turn {
    pub fn new(
        player_action: impl Into<String>,
        narrative: impl Into<String>,
        illustration: MediaOutcome<Illustration>,
        narration: MediaOutcome<Narration>,
    ) -> Self {
        Self {
            player_action: player_action.into(),
            narrative: narrative.into(),
            illustration,
            narration,
        }
    }

    pub fn player_action(&self) -> &str {
        &self.player_action
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn illustration(&self) -> &MediaOutcome<Illustration> {
        &self.illustration
    }

    pub fn narration(&self) -> &MediaOutcome<Narration> {
        &self.narration
    }
}
