pub mod engine;
pub mod protocol;
pub mod pipeline;

pub mod sanitizer;
pub mod story;
pub mod llm_client;
pub mod illustration;
pub mod narrator;
