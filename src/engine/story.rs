use crate::engine::llm_client::{GenerationParams, ModelError, TextModel};
use crate::engine::sanitizer::sanitize;
use crate::model::story_settings::StorySettings;

/// Marker that ends every prompt; the story continues after it.
pub const RESULT_MARKER: &str = "Result:";

/// Used when the model produces nothing worth showing.
pub const FALLBACK_NARRATIVE: &str = "The darkness shifts, and something unexpected happens.";

const MIN_NARRATIVE_CHARS: usize = 5;

pub fn build_prompt(settings: &StorySettings, action: &str) -> String {
    format!(
        "{} Story.\nHero: {}.\nAction: {}.\n{RESULT_MARKER}",
        settings.genre.label(),
        settings.character_name,
        action
    )
}

pub fn generation_params(creativity: f32) -> GenerationParams {
    GenerationParams {
        max_new_tokens: 60,
        temperature: creativity,
        top_p: 0.92,
        repetition_penalty: 1.3,
        no_repeat_ngram_size: 3,
    }
}

/// Pulls the new story text out of the decoded model output.
///
/// Takes whatever follows the last result marker; without a marker the
/// prompt itself is stripped instead. Short or empty text becomes the
/// fallback sentence.
pub fn extract_narrative(prompt: &str, cleaned_output: &str) -> String {
    let narrative = match cleaned_output.rsplit_once(RESULT_MARKER) {
        Some((_, after)) => after.trim().to_string(),
        None => cleaned_output.replace(prompt, "").trim().to_string(),
    };

    if narrative.chars().count() < MIN_NARRATIVE_CHARS {
        FALLBACK_NARRATIVE.to_string()
    } else {
        narrative
    }
}

/// Continues the story for one player action.
pub fn continue_story(
    model: &dyn TextModel,
    settings: &StorySettings,
    action: &str,
) -> Result<String, ModelError> {
    let prompt = build_prompt(settings, action);
    let params = generation_params(settings.clamped_creativity());
    let raw = model.generate(&prompt, &params)?;
    Ok(extract_narrative(&prompt, &sanitize(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::genre::Genre;
    use std::sync::Mutex;

    /// Appends a fixed continuation and remembers what it was asked.
    struct ScriptedModel {
        continuation: String,
        seen: Mutex<Vec<(String, GenerationParams)>>,
    }

    impl ScriptedModel {
        fn new(continuation: &str) -> Self {
            Self {
                continuation: continuation.into(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextModel for ScriptedModel {
        fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
            self.seen.lock().unwrap().push((prompt.into(), params.clone()));
            Ok(format!("{prompt}{}", self.continuation))
        }
    }

    fn settings(genre: Genre, name: &str, creativity: f32) -> StorySettings {
        StorySettings {
            genre,
            character_name: name.into(),
            creativity,
            ..StorySettings::default()
        }
    }

    #[test]
    fn prompt_format() {
        let s = settings(Genre::Horror, "Arthur", 0.6);
        assert_eq!(
            build_prompt(&s, "open the door"),
            "Horror Story.\nHero: Arthur.\nAction: open the door.\nResult:"
        );
    }

    #[test]
    fn continuation_follows_last_marker() {
        let model = ScriptedModel::new(" The hinges scream!!! A cold wind rushes in.");
        let s = settings(Genre::Horror, "Arthur", 0.6);

        let out = continue_story(&model, &s, "open the door").unwrap();

        assert_eq!(out, "The hinges scream! A cold wind rushes in.");
    }

    #[test]
    fn uses_fixed_decoding_settings() {
        let model = ScriptedModel::new(" Something moves in the dark.");
        let s = settings(Genre::Mystery, "Vera", 0.35);

        continue_story(&model, &s, "listen").unwrap();

        let seen = model.seen.lock().unwrap();
        let (_, params) = &seen[0];
        assert_eq!(params.temperature, 0.35);
        assert_eq!(params.top_p, 0.92);
        assert_eq!(params.repetition_penalty, 1.3);
        assert_eq!(params.no_repeat_ngram_size, 3);
        assert_eq!(params.max_new_tokens, 60);
    }

    #[test]
    fn short_output_falls_back_for_every_combination() {
        let outputs = ["", "  ", "ok.", "http://spam.example", "[#]", "!!!!"];
        let names = ["Arthur", "Zed", ""];
        let actions = ["open the door", "run", "?"];
        let creativities = [0.1, 0.6, 1.0];

        for out in outputs {
            let model = ScriptedModel::new(out);
            for genre in Genre::ALL {
                for name in names {
                    for action in actions {
                        for c in creativities {
                            let s = settings(genre.clone(), name, c);
                            let story = continue_story(&model, &s, action).unwrap();
                            assert_eq!(story, FALLBACK_NARRATIVE, "output {out:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn missing_marker_strips_prompt() {
        let prompt = "Fantasy Story.\nHero: Ana.\nAction: wait.\nResult:";
        let cleaned = "Fantasy Story.\nHero: Ana.\nAction: wait.\nThe hours pass quietly.";

        // Marker lost, prompt not a prefix either: text is kept as-is.
        assert_eq!(extract_narrative(prompt, cleaned), cleaned);

        let echoed = format!("{prompt} Dawn breaks over the hills.");
        let without_marker = echoed.replace(RESULT_MARKER, "");
        let prompt_without_marker = prompt.replace(RESULT_MARKER, "");
        assert_eq!(
            extract_narrative(&prompt_without_marker, &without_marker),
            "Dawn breaks over the hills."
        );
    }

    #[test]
    fn model_errors_propagate() {
        struct Broken;
        impl TextModel for Broken {
            fn generate(&self, _: &str, _: &GenerationParams) -> Result<String, ModelError> {
                Err(ModelError::EmptyResponse)
            }
        }

        let err = continue_story(&Broken, &StorySettings::default(), "look").unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse));
    }
}
