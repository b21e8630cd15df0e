use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ModelConfig;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("could not reach the model server at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model server answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model '{0}' is not served by the model server")]
    NotServed(String),
    #[error("model server returned no completion")]
    EmptyResponse,
    #[error("invalid model server response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Fixed decoding settings for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub no_repeat_ngram_size: u32,
}

/// A text-completion model.
///
/// `generate` returns the decoded sequence including the prompt, the way a
/// causal LM decodes its whole output buffer.
pub trait TextModel: Send + Sync {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError>;
}

#[derive(Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub no_repeat_ngram_size: u32,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Client for an OpenAI-compatible local server (LM Studio, llama.cpp server).
pub struct LocalModel {
    client: Client,
    base_url: String,
    model: String,
}

impl LocalModel {
    /// Connects to the server and checks the configured model is available.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ModelError::Client)?;

        let model = Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        };
        let served = model.served_models()?;
        if !served.is_empty() && !served.iter().any(|id| id == &model.model) {
            return Err(ModelError::NotServed(model.model));
        }

        info!(
            "model '{}' ready at {} ({} models served)",
            model.model,
            model.base_url,
            served.len()
        );
        Ok(model)
    }

    fn served_models(&self) -> Result<Vec<String>, ModelError> {
        let url = format!("{}/models", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|source| ModelError::Unreachable { url, source })?;

        if !resp.status().is_success() {
            return Err(ModelError::Status {
                status: resp.status().as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }

        let list: ModelList = resp.json().map_err(ModelError::Decode)?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

impl TextModel for LocalModel {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
        let url = format!("{}/completions", self.base_url);
        let req = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            repeat_penalty: params.repetition_penalty,
            no_repeat_ngram_size: params.no_repeat_ngram_size,
            stream: false,
        };

        debug!("completion request: {} prompt chars, {params:?}", prompt.len());

        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .map_err(|source| ModelError::Unreachable { url, source })?;

        if !resp.status().is_success() {
            return Err(ModelError::Status {
                status: resp.status().as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }

        let body: CompletionResponse = resp.json().map_err(ModelError::Decode)?;
        let continuation = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(ModelError::EmptyResponse)?;

        Ok(format!("{prompt}{continuation}"))
    }
}

static MODEL: OnceLock<LocalModel> = OnceLock::new();
static MODEL_INIT: Mutex<()> = Mutex::new(());

/// Loads the process-wide model once. Later calls return the same instance.
///
/// Concurrent first calls are serialized so the server is contacted only once.
pub fn init_model(config: &ModelConfig) -> Result<&'static LocalModel, ModelError> {
    if let Some(model) = MODEL.get() {
        return Ok(model);
    }

    let _guard = MODEL_INIT.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(model) = MODEL.get() {
        return Ok(model);
    }

    let model = LocalModel::load(config)?;
    Ok(MODEL.get_or_init(|| model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, serve, StubResponse};

    fn config(base_url: String) -> ModelConfig {
        ModelConfig {
            base_url: format!("{base_url}/v1"),
            model: "gpt2".into(),
            timeout_secs: 5,
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            max_new_tokens: 60,
            temperature: 0.6,
            top_p: 0.92,
            repetition_penalty: 1.3,
            no_repeat_ngram_size: 3,
        }
    }

    #[test]
    fn generate_returns_prompt_plus_continuation() {
        let server = serve(vec![
            StubResponse::json(200, r#"{"data":[{"id":"gpt2"}]}"#),
            StubResponse::json(200, r#"{"choices":[{"text":" The door opens."}]}"#),
        ]);

        let model = LocalModel::load(&config(server.url)).unwrap();
        let out = model.generate("Result:", &params()).unwrap();

        assert_eq!(out, "Result: The door opens.");

        let models_req = server.requests.recv().unwrap();
        assert_eq!(models_req.request_line, "GET /v1/models HTTP/1.1");

        let completion = server.requests.recv().unwrap();
        assert_eq!(completion.request_line, "POST /v1/completions HTTP/1.1");
        let body: serde_json::Value = serde_json::from_slice(&completion.body).unwrap();
        assert_eq!(body["model"], "gpt2");
        assert_eq!(body["max_tokens"], 60);
        assert_eq!(body["no_repeat_ngram_size"], 3);
    }

    #[test]
    fn load_rejects_missing_model() {
        let server = serve(vec![StubResponse::json(200, r#"{"data":[{"id":"llama"}]}"#)]);

        let err = LocalModel::load(&config(server.url)).err().unwrap();
        assert!(matches!(err, ModelError::NotServed(ref m) if m == "gpt2"));
    }

    #[test]
    fn server_error_is_reported() {
        let server = serve(vec![
            StubResponse::json(200, r#"{"data":[]}"#),
            StubResponse::json(500, r#"{"error":"boom"}"#),
        ]);

        let model = LocalModel::load(&config(server.url)).unwrap();
        let err = model.generate("x", &params()).unwrap_err();
        assert!(matches!(err, ModelError::Status { status: 500, .. }));
    }

    #[test]
    fn unreachable_server_fails_to_load() {
        let err = LocalModel::load(&config(dead_url())).err().unwrap();
        assert!(matches!(err, ModelError::Unreachable { .. }));
    }

    #[test]
    fn init_model_loads_once_across_threads() {
        let server = serve(vec![StubResponse::json(200, r#"{"data":[{"id":"gpt2"}]}"#)]);
        let cfg = config(server.url);

        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| init_model(&cfg));
            let b = s.spawn(|| init_model(&cfg));
            (a.join().unwrap().unwrap(), b.join().unwrap().unwrap())
        });
        let again = init_model(&cfg).unwrap();

        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(a, again));
        assert!(server.requests.recv().unwrap().request_line.starts_with("GET /v1/models"));
        assert!(server.requests.try_recv().is_err());
    }
}
