//! Ollama chat provider for local models

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sibyl_core::{ChatProvider, GenerationRequest, SibylError, SibylResult};
use tracing::debug;

use crate::http::{status_error, transport_error};

/// Chat provider backed by a local Ollama instance
pub struct OllamaChat {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaChat {
    /// Create a new provider against `base_url`
    pub fn new(base_url: String, model: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaChat {
    async fn submit(&self, request: GenerationRequest) -> SibylResult<String> {
        let api_request = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });

        let url = format!("{}/api/chat", self.base_url);
        debug!(%url, model = %self.model, "Submitting chat completion");

        let response = self
            .client
            .post(&url)
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
            return Err(status_error("Ollama", status, body));
        }

        let completion: OllamaChatResponse = response.json().await.map_err(|e| {
            SibylError::BackendUnavailable(format!("Failed to parse Ollama response: {e}"))
        })?;
        Ok(completion.message.content)
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Ollama API response types
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_creation() {
        let provider = OllamaChat::new(
            "http://localhost:11434".to_string(),
            "llama3".to_string(),
            120,
        );
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model(), "llama3");
    }
}
