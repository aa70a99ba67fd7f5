//! Ollama embedding provider

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sibyl_core::{EmbeddingProvider, SibylError, SibylResult};

use crate::http::embed_transport_error;

/// Embedding provider backed by a local Ollama instance
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl OllamaEmbedder {
    /// Create a new embedder against `base_url`
    pub fn new(base_url: String, model: String, dimensions: usize, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            dimensions,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> SibylResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| embed_transport_error(e, self.timeout.as_secs()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SibylError::Embedding(format!(
                "Ollama embeddings error ({status}): {body}"
            )));
        }

        let parsed: OllamaEmbeddingResponse = response.json().await.map_err(|e| {
            SibylError::Embedding(format!("Failed to parse Ollama embedding response: {e}"))
        })?;
        Ok(parsed.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> SibylResult<Vec<Vec<f32>>> {
        // The legacy embeddings endpoint is single-input; issue one
        // request per text
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// Ollama API response types
#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}
