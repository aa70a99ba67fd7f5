//! Traits for external collaborators
//!
//! The core defines the abstractions; concrete providers live in
//! `sibyl-llm` and are selected once at configuration time. Backend
//! selection is a runtime value behind these traits: no per-call
//! dispatch, no provider-specific types leaking into the pipeline.

use async_trait::async_trait;

use crate::error::SibylResult;
use crate::types::GenerationRequest;

/// Maps text to a fixed-length dense vector. Deterministic per model
/// version.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> SibylResult<Vec<f32>>;

    /// Embed a batch of texts, preserving order
    async fn embed_batch(&self, texts: &[String]) -> SibylResult<Vec<Vec<f32>>>;

    /// Dimensionality of produced vectors
    fn dimensions(&self) -> usize;

    /// Model fingerprint stored with every record this provider embeds
    fn model_name(&self) -> &str;
}

/// Sends a rendered prompt to a text-generation service and returns the
/// raw completion.
///
/// Implementations must surface failures as `BackendUnavailable` /
/// `BackendTimeout` and never retry internally; retry policy belongs to
/// the caller.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Submit one prompt, returning the backend's raw text
    async fn submit(&self, request: GenerationRequest) -> SibylResult<String>;

    /// Human-readable provider name for logs
    fn provider_name(&self) -> &str;

    /// The model this provider was configured with
    fn model(&self) -> &str;
}
