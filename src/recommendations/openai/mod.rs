#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ConfigError, OpenAiConfig};
use crate::{AdvisorError, Result};

/// Sampling temperature used for every recommendation request
pub const TEMPERATURE: f32 = 0.4;

/// Blocking client for an OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: Url,
    model: String,
    api_key: String,
    agent: ureq::Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[inline]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiClient {
    #[inline]
    pub fn new(config: &OpenAiConfig, api_key: &str) -> Result<Self> {
        // Joining relative paths needs the base to end with a slash
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url =
            Url::parse(&base).map_err(|_| ConfigError::InvalidUrl(config.base_url.clone()))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.model.clone(),
            api_key: api_key.to_string(),
            agent,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        self
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single-turn chat request and return the reply verbatim
    #[inline]
    pub fn complete(&self, prompt: &str) -> Result<String> {
        self.chat_completion(&[ChatMessage::user(prompt)])
    }

    /// Send `messages` to `/chat/completions` and return the first choice's content
    #[inline]
    pub fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|e| AdvisorError::Request(format!("Failed to build completion URL: {e}")))?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| AdvisorError::Request(format!("Failed to serialize request: {e}")))?;

        debug!(
            "Requesting chat completion from {} with model {} ({} prompt chars)",
            url,
            self.model,
            messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let mut response = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send(&request_json)
            .map_err(|e| AdvisorError::Request(format!("Transport error: {e}")))?;

        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AdvisorError::Request(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body).map_or_else(
                |_| format!("HTTP {}", status.as_u16()),
                |err| format!("HTTP {}: {}", status.as_u16(), err.error.message),
            );
            warn!("Chat completion failed: {}", detail);
            return Err(AdvisorError::Request(detail));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisorError::Request(format!("Failed to parse response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AdvisorError::Request("Response contained no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| AdvisorError::Request("Response message has no content".to_string()))?;

        info!("Received {} characters from {}", content.len(), self.model);
        Ok(content)
    }
}
