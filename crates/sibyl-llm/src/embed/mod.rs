//! Embedding providers backing the context store

mod ollama;
mod openai;

use std::sync::Arc;

pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;

use sibyl_config::{EmbeddingConfig, EmbeddingProviderType};
use sibyl_core::{EmbeddingProvider, SibylError, SibylResult};
use tracing::info;

/// Build the configured embedding provider
pub fn create_embedding_provider(
    config: &EmbeddingConfig,
) -> SibylResult<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderType::Ollama => Arc::new(OllamaEmbedder::new(
            config.endpoint(),
            config.model_name(),
            config.dimensions(),
            config.timeout_secs(),
        )),
        EmbeddingProviderType::OpenAi => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                SibylError::Config(
                    "no API key configured for OpenAI embeddings; \
                     set embedding.api_key or OPENAI_API_KEY"
                        .to_string(),
                )
            })?;
            Arc::new(OpenAiEmbedder::new(
                api_key,
                config.endpoint(),
                config.model_name(),
                config.dimensions(),
                config.timeout_secs(),
            ))
        }
    };

    info!(
        model = provider.model_name(),
        dimensions = provider.dimensions(),
        "Initialized embedding provider"
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_factory_uses_defaults() {
        let provider = create_embedding_provider(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.model_name(), "nomic-embed-text");
        assert_eq!(provider.dimensions(), 768);
    }
}
