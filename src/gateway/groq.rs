//! Groq chat completions over HTTP

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{ChatRequest, CompletionBackend};
use crate::config::ApiConfig;
use crate::error::{ExpertError, Result};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions endpoint
pub struct GroqBackend {
    endpoint: String,
    key_env: String,
    env_file: PathBuf,
    agent: ureq::Agent,
}

impl GroqBackend {
    pub fn new(api: &ApiConfig, env_file: PathBuf) -> Self {
        let timeout = (api.timeout_secs > 0).then(|| Duration::from_secs(api.timeout_secs));
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            endpoint: format!("{}/chat/completions", api.base_url.trim_end_matches('/')),
            key_env: api.key_env.clone(),
            env_file,
            agent,
        }
    }

    /// Looked up on every call so a key added mid-session is picked up
    fn api_key(&self) -> Result<String> {
        resolve_api_key(&self.key_env, &self.env_file)
    }
}

impl CompletionBackend for GroqBackend {
    fn send(&self, request: &ChatRequest) -> Result<String> {
        let api_key = self.api_key()?;

        let request_body = serde_json::to_string(request)
            .map_err(|e| ExpertError::upstream(format!("failed to serialize request: {}", e)))?;

        log::debug!(
            "POST {} (model={}, prompt_chars={})",
            self.endpoint,
            request.model,
            request.prompt().chars().count()
        );

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .send(request_body.as_bytes())?;

        let status = response.status();
        let response_body = response.body_mut().read_to_string()?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &response_body));
        }

        parse_completion(&response_body)
    }
}

/// Upstream error for a non-2xx reply, preferring the API's own message
fn status_error(status: u16, body: &str) -> ExpertError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.chars().take(200).collect());

    ExpertError::upstream(format!("HTTP {}: {}", status, detail))
}

/// Extract the top choice's text from a chat completions body
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ExpertError::upstream(format!("malformed response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ExpertError::upstream("response contained no completion"))
}

/// Find the API key in the environment, then in a `.env` file
pub fn resolve_api_key(env_var: &str, env_file: &Path) -> Result<String> {
    if let Ok(key) = std::env::var(env_var)
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    if let Ok(content) = fs::read_to_string(env_file) {
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            if let Some((key, value)) = line.split_once('=')
                && key.trim() == env_var
            {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if !value.is_empty() {
                    return Ok(value.to_string());
                }
            }
        }
    }

    Err(ExpertError::Credential {
        env_var: env_var.to_string(),
        env_file: env_file.display().to_string(),
    })
}
