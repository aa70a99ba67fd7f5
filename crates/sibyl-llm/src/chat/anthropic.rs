//! Anthropic messages API chat provider

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sibyl_core::{ChatProvider, GenerationRequest, SibylError, SibylResult};
use tracing::debug;

use crate::http::{status_error, transport_error};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Chat provider for the Anthropic messages API
pub struct AnthropicChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl AnthropicChat {
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
impl ChatProvider for AnthropicChat {
    async fn submit(&self, request: GenerationRequest) -> SibylResult<String> {
        let api_request = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{"role": "user", "content": request.prompt}],
        });

        let url = format!("{}/v1/messages", self.base_url);
        debug!(%url, model = %self.model, "Submitting chat completion");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
            return Err(status_error("Anthropic", status, body));
        }

        let completion: MessagesResponse = response.json().await.map_err(|e| {
            SibylError::BackendUnavailable(format!("Failed to parse Anthropic response: {e}"))
        })?;

        // Concatenate text blocks; tool blocks never appear for plain prompts
        let text = completion
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Anthropic API response types
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
