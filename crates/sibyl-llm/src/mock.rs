//! Deterministic in-process providers for tests
//!
//! `HashEmbedder` gives repeatable vectors without a model server, with
//! shared tokens pulling texts closer together so similarity ordering is
//! meaningful. `ScriptedChat` replays canned responses and records every
//! prompt it was given.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sibyl_core::{
    ChatProvider, EmbeddingProvider, GenerationRequest, SibylError, SibylResult,
};

/// Deterministic token-hash embedder
pub struct HashEmbedder {
    dimensions: usize,
    model: String,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model: "hash-embedder".to_string(),
        }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.split_whitespace() {
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in token.to_lowercase().bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        let norm = vector.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm > 0.0 {
            for c in &mut vector {
                *c /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> SibylResult<Vec<f32>> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> SibylResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Chat provider replaying a fixed script of responses
pub struct ScriptedChat {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt submitted so far, in order
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn submit(&self, request: GenerationRequest) -> SibylResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt);
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .ok_or_else(|| {
                SibylError::BackendUnavailable("scripted chat ran out of responses".to_string())
            })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("how many orders").await.unwrap();
        let b = embedder.embed("how many orders").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn shared_tokens_raise_similarity() {
        let embedder = HashEmbedder::new(64);
        let query = embedder.embed("count of orders").await.unwrap();
        let near = embedder.embed("orders table with status").await.unwrap();
        let far = embedder.embed("employee salary bands").await.unwrap();

        let dot = |x: &[f32], y: &[f32]| x.iter().zip(y).map(|(a, b)| a * b).sum::<f32>();
        assert!(dot(&query, &near) > dot(&query, &far));
    }

    #[tokio::test]
    async fn scripted_chat_replays_and_records() {
        let chat = ScriptedChat::new(["SELECT 1", "SELECT 2"]);
        let request = GenerationRequest {
            prompt: "first".to_string(),
            temperature: 0.0,
            max_tokens: 100,
        };
        assert_eq!(chat.submit(request.clone()).await.unwrap(), "SELECT 1");
        assert_eq!(chat.submit(request).await.unwrap(), "SELECT 2");
        assert_eq!(chat.recorded_prompts(), vec!["first", "first"]);

        let empty = GenerationRequest {
            prompt: "third".to_string(),
            temperature: 0.0,
            max_tokens: 100,
        };
        assert!(chat.submit(empty).await.is_err());
    }
}
