//! Completion gateway
//!
//! Wraps the text-generation backend with per-model token ceilings and the
//! fixed sampling parameters every expertbot prompt is sent with.

pub mod groq;

use serde::Serialize;

use crate::error::{ExpertError, Result};

pub use groq::GroqBackend;

/// System directive sent ahead of every prompt
pub const SYSTEM_DIRECTIVE: &str = "You are a helpful assistant.";

/// Token ceiling for models missing from [`MODELS`]
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Selectable models and their token ceilings, in display order
pub const MODELS: &[(&str, u32)] = &[
    ("mixtral-8x7b-32768", 32768),
    ("llama2-70b-4096", 4096),
    ("gemma-7b-it", 8192),
];

/// Names of the selectable models
pub fn model_names() -> Vec<&'static str> {
    MODELS.iter().map(|(name, _)| *name).collect()
}

/// Token ceiling for a model
pub fn max_tokens_for(model: &str) -> u32 {
    MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, max)| *max)
        .unwrap_or(DEFAULT_MAX_TOKENS)
}

/// Sampling temperature in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Temperature(f32);

impl Temperature {
    pub fn new(value: f32) -> std::result::Result<Self, String> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("temperature must be between 0.0 and 1.0, got {}", value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl std::str::FromStr for Temperature {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid temperature: {}", s))?;
        Self::new(value)
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stop: Option<Vec<String>>,
    pub stream: bool,
}

impl ChatRequest {
    /// Single-turn request with the fixed system directive
    pub fn single_turn(prompt: &str, model: &str, temperature: Temperature) -> Self {
        Self {
            messages: vec![
                ChatMessage::new("system", SYSTEM_DIRECTIVE),
                ChatMessage::new("user", prompt),
            ],
            model: model.to_string(),
            temperature: temperature.value(),
            max_tokens: max_tokens_for(model),
            top_p: 1.0,
            stop: None,
            stream: false,
        }
    }

    pub fn prompt(&self) -> &str {
        self.messages.last().map(|m| m.content.as_str()).unwrap_or("")
    }
}

/// A text-generation backend
pub trait CompletionBackend {
    /// Send one request and return the top choice's text
    fn send(&self, request: &ChatRequest) -> Result<String>;
}

/// Front door for every generation call made by the pipeline
pub struct CompletionGateway {
    backend: Box<dyn CompletionBackend>,
}

impl CompletionGateway {
    pub fn new(backend: Box<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn max_tokens_for(&self, model: &str) -> u32 {
        max_tokens_for(model)
    }

    /// Generate a completion for `prompt`
    pub fn complete(&self, prompt: &str, model: &str, temperature: Temperature) -> Result<String> {
        let request = ChatRequest::single_turn(prompt, model, temperature);

        log::info!(
            "Requesting completion: model={}, temperature={}, max_tokens={}, prompt_chars={}",
            request.model,
            temperature,
            request.max_tokens,
            prompt.chars().count()
        );

        match self.backend.send(&request) {
            Ok(text) => {
                log::debug!("Completion returned {} chars", text.chars().count());
                Ok(text)
            }
            Err(e) => {
                log::error!("Completion failed: {}", e);
                Err(e)
            }
        }
    }
}

impl From<ureq::Error> for ExpertError {
    fn from(e: ureq::Error) -> Self {
        ExpertError::upstream(e.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;

    #[test]
    fn test_max_tokens_for_known_models() {
        assert_eq!(max_tokens_for("mixtral-8x7b-32768"), 32768);
        assert_eq!(max_tokens_for("llama2-70b-4096"), 4096);
        assert_eq!(max_tokens_for("gemma-7b-it"), 8192);
    }

    #[test]
    fn test_max_tokens_for_unknown_models() {
        for model in ["", "gpt-4", "GEMMA-7B-IT", "mixtral"] {
            assert_eq!(max_tokens_for(model), DEFAULT_MAX_TOKENS, "model {:?}", model);
        }
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(Temperature::new(0.0).is_ok());
        assert!(Temperature::new(1.0).is_ok());
        assert!(Temperature::new(-0.01).is_err());
        assert!(Temperature::new(1.01).is_err());
        assert!("abc".parse::<Temperature>().is_err());
        assert_eq!("0.35".parse::<Temperature>().unwrap().value(), 0.35);
    }

    #[test]
    fn test_request_shape() {
        let backend = ScriptedBackend::new().reply("hello");
        let gateway = backend.gateway();

        let text = gateway
            .complete("Explain tides", "gemma-7b-it", Temperature::new(0.5).unwrap())
            .unwrap();
        assert_eq!(text, "hello");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, SYSTEM_DIRECTIVE);
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.prompt(), "Explain tides");
        assert_eq!(request.max_tokens, 8192);
        assert_eq!(request.top_p, 1.0);
        assert_eq!(request.stop, None);
        assert!(!request.stream);
    }

    #[test]
    fn test_request_serializes_null_stop() {
        let request = ChatRequest::single_turn("hi", "llama2-70b-4096", Temperature::default());
        let json = serde_json::to_value(&request).unwrap();

        assert!(json["stop"].is_null());
        assert_eq!(json["stream"], false);
        assert_eq!(json["max_tokens"], 4096);
    }

    #[test]
    fn test_backend_failure_is_returned() {
        let backend = ScriptedBackend::new().fail(ExpertError::upstream("rate limited"));
        let gateway = backend.gateway();

        let err = gateway
            .complete("hi", "gemma-7b-it", Temperature::default())
            .unwrap_err();
        assert!(matches!(err, ExpertError::Upstream(_)));
    }
}
