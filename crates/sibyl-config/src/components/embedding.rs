//! Embedding provider configuration

use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_EMBED_TIMEOUT_SECS;
use crate::error::{ConfigError, ConfigResult};

/// Which embedding service to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// Local Ollama instance, no API key required
    #[default]
    Ollama,
    /// OpenAI embeddings API
    #[serde(rename = "openai")]
    OpenAi,
}

impl EmbeddingProviderType {
    /// Default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            EmbeddingProviderType::Ollama => "http://localhost:11434",
            EmbeddingProviderType::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            EmbeddingProviderType::Ollama => "nomic-embed-text",
            EmbeddingProviderType::OpenAi => "text-embedding-3-small",
        }
    }

    /// Expected dimensions of the default model
    pub fn default_dimensions(&self) -> usize {
        match self {
            EmbeddingProviderType::Ollama => 768,  // nomic-embed-text
            EmbeddingProviderType::OpenAi => 1536, // text-embedding-3-small
        }
    }

    /// Whether this provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, EmbeddingProviderType::OpenAi)
    }
}

/// Embedding provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider selection
    #[serde(default)]
    pub provider: EmbeddingProviderType,
    /// Model name; provider default when unset
    pub model: Option<String>,
    /// Endpoint URL override
    pub endpoint: Option<String>,
    /// API key (OpenAI only); falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Vector dimensionality; provider default when unset
    pub dimensions: Option<usize>,
    /// Deadline for one embedding call, in seconds; 60 when unset
    pub timeout_secs: Option<u64>,
}

impl EmbeddingConfig {
    /// Endpoint, using the provider default when unset
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint().to_string())
    }

    /// Model, using the provider default when unset
    pub fn model_name(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Dimensions, using the provider default when unset
    pub fn dimensions(&self) -> usize {
        self.dimensions
            .unwrap_or_else(|| self.provider.default_dimensions())
    }

    /// Deadline for one embedding call
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_EMBED_TIMEOUT_SECS)
    }

    /// Configured key, or `OPENAI_API_KEY`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }

    /// Range-check the tunables
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dimensions == Some(0) {
            return Err(ConfigError::Invalid(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "embedding.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(model) = &self.model {
            if model.is_empty() {
                return Err(ConfigError::Invalid(
                    "embedding.model must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_defaults() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.endpoint(), "http://localhost:11434");
        assert_eq!(config.model_name(), "nomic-embed-text");
        assert_eq!(config.dimensions(), 768);
    }

    #[test]
    fn openai_defaults() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderType::OpenAi,
            ..Default::default()
        };
        assert_eq!(config.model_name(), "text-embedding-3-small");
        assert_eq!(config.dimensions(), 1536);
    }

    #[test]
    fn timeout_defaults_and_override() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.timeout_secs(), 60);

        let config = EmbeddingConfig {
            timeout_secs: Some(5),
            ..Default::default()
        };
        assert_eq!(config.timeout_secs(), 5);
        assert!(config.validate().is_ok());

        let config = EmbeddingConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_dimensions_rejected() {
        let config = EmbeddingConfig {
            dimensions: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
