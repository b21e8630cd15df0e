use crate::engine::pipeline::TurnStage;
use crate::model::story_settings::StorySettings;
use crate::model::turn::Turn;

pub enum EngineCommand {
    SubmitAction {
        action: String,
        settings: StorySettings,
    },
    ResetStory,
}

pub enum EngineResponse {
    Stage(TurnStage),
    TurnCommitted(Turn),
    StoryReset,
    TurnFailed(String),
}
