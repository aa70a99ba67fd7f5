//! OpenAI-compatible chat provider
//!
//! Works against api.openai.com and any relay exposing the same
//! `/chat/completions` surface (DeepSeek, MiniMax, Qwen, vLLM).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sibyl_core::{ChatProvider, GenerationRequest, SibylError, SibylResult};
use tracing::debug;

use crate::http::{status_error, transport_error};

/// OpenAI-compatible chat provider
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiChat {
    /// Create a new provider against `base_url`
    pub fn new(api_key: String, base_url: String, model: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn submit(&self, request: GenerationRequest) -> SibylResult<String> {
        let api_request = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %self.model, "Submitting chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout.as_secs()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error("OpenAI", status, body));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            SibylError::BackendUnavailable(format!("Failed to parse OpenAI response: {e}"))
        })?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            SibylError::BackendUnavailable("No choices in OpenAI response".to_string())
        })?;
        Ok(choice.message.content.unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// OpenAI API response types
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
