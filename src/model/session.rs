use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use uuid::Uuid;

use crate::model::transcript::Transcript;
use crate::model::turn::Turn;

/// One player's story in progress.
///
/// Owns the transcript and a private directory for narration files so two
/// sessions never write to the same audio path.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    transcript: Transcript,
    audio_dir: PathBuf,
}

impl Session {
    /// Starts an empty session whose narration files live under
    /// `<audio_root>/<session id>/`. The directory is created lazily.
    pub fn create(audio_root: &Path) -> Self {
        let id = Uuid::new_v4();
        info!("session {id} created");
        Self {
            id,
            transcript: Transcript::new(),
            audio_dir: audio_root.join(id.to_string()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Where the narration for the next turn is written.
    pub fn next_narration_path(&self) -> PathBuf {
        self.audio_dir()
            .join(format!("turn-{}.mp3", self.transcript.len() + 1))
    }

    pub fn commit(&mut self, turn: Turn) -> &Turn {
        self.transcript.push(turn)
    }

    /// Drops the whole story and any narration recorded for it.
    pub fn reset(&mut self) {
        info!("session {} reset ({} turns dropped)", self.id, self.transcript.len());
        self.transcript.clear();
        self.remove_audio();
    }

    /// Ends the session, deleting its audio directory.
    pub fn close(mut self) {
        self.transcript.clear();
        self.remove_audio();
        info!("session {} closed", self.id);
    }

    fn remove_audio(&self) {
        let dir = self.audio_dir();
        if !dir.exists() {
            return;
        }
        if let Err(e) = fs::remove_dir_all(dir) {
            warn!("could not remove narration files in {}: {e}", dir.display());
        }
    }
}
