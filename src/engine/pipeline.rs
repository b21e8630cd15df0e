use log::info;
use thiserror::Error;

use crate::engine::illustration::{image_prompt, Illustrator};
use crate::engine::llm_client::{ModelError, TextModel};
use crate::engine::narrator::{narrate, SpeechSynthesizer};
use crate::engine::story::continue_story;
use crate::model::session::Session;
use crate::model::story_settings::StorySettings;
use crate::model::turn::{MediaOutcome, Turn};

/// Where a turn is in its life. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Idle,
    Generating,
    Illustrating,
    Narrating,
    Committed,
}

impl TurnStage {
    pub fn label(self) -> &'static str {
        match self {
            TurnStage::Idle => "Waiting for your move",
            TurnStage::Generating => "Writing the next chapter...",
            TurnStage::Illustrating => "Painting the scene...",
            TurnStage::Narrating => "Recording the narration...",
            TurnStage::Committed => "Done",
        }
    }
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("type an action first")]
    EmptyAction,
    #[error("story generation failed: {0}")]
    Generation(#[from] ModelError),
}

/// Runs one player action through story, picture and voice, in that order.
pub struct TurnPipeline<'m> {
    model: &'m dyn TextModel,
    illustrator: Box<dyn Illustrator>,
    speech: Box<dyn SpeechSynthesizer>,
    language: String,
}

impl<'m> TurnPipeline<'m> {
    pub fn new(
        model: &'m dyn TextModel,
        illustrator: Box<dyn Illustrator>,
        speech: Box<dyn SpeechSynthesizer>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            model,
            illustrator,
            speech,
            language: language.into(),
        }
    }

    /// Plays one turn and appends it to the session's transcript.
    ///
    /// `on_stage` sees every stage the turn passes through. Media steps that
    /// are switched off are skipped without being reported. On error nothing
    /// is appended.
    pub fn take_turn<'s>(
        &self,
        session: &'s mut Session,
        settings: &StorySettings,
        action: &str,
        mut on_stage: impl FnMut(TurnStage),
    ) -> Result<&'s Turn, TurnError> {
        if action.trim().is_empty() {
            return Err(TurnError::EmptyAction);
        }

        on_stage(TurnStage::Generating);
        let narrative = continue_story(self.model, settings, action)?;

        let illustration = if settings.enable_image {
            on_stage(TurnStage::Illustrating);
            self.illustrator
                .illustrate(&image_prompt(&narrative, &settings.genre))
        } else {
            MediaOutcome::Disabled
        };

        let narration = if settings.enable_voice {
            on_stage(TurnStage::Narrating);
            let path = session.next_narration_path();
            narrate(self.speech.as_ref(), &narrative, &self.language, &path)
        } else {
            MediaOutcome::Disabled
        };

        info!(
            "session {}: turn {} committed (image ready: {}, voice ready: {})",
            session.id(),
            session.transcript().len() + 1,
            illustration.is_ready(),
            narration.is_ready()
        );
        let turn = session.commit(Turn::new(action, narrative, illustration, narration));
        on_stage(TurnStage::Committed);
        Ok(turn)
    }
}
