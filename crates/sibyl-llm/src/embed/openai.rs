//! OpenAI embeddings API provider

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sibyl_core::{EmbeddingProvider, SibylError, SibylResult};

use crate::http::embed_transport_error;

/// Embedding provider for the OpenAI `/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl OpenAiEmbedder {
    /// Create a new embedder against `base_url`
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        dimensions: usize,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
            dimensions,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn request(&self, input: &[&str]) -> SibylResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "input": input,
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
                "OpenAI embeddings error ({status}): {body}"
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            SibylError::Embedding(format!("Failed to parse OpenAI embedding response: {e}"))
        })?;

        // The API may return items out of order; restore input order
        let mut items = parsed.data;
        items.sort_by_key(|item| item.index);
        Ok(items.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> SibylResult<Vec<f32>> {
        let mut vectors = self.request(&[text]).await?;
        vectors.pop().ok_or_else(|| {
            SibylError::Embedding("OpenAI returned no embedding for input".to_string())
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> SibylResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.request(&refs).await?;
        if vectors.len() != texts.len() {
            return Err(SibylError::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
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

// OpenAI API response types
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedder_creation() {
        let embedder = OpenAiEmbedder::new(
            "sk-test".to_string(),
            "https://api.openai.com/v1".to_string(),
            "text-embedding-3-small".to_string(),
            1536,
            60,
        );
        assert_eq!(embedder.model_name(), "text-embedding-3-small");
        assert_eq!(embedder.dimensions(), 1536);
    }
}
