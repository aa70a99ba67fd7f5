//! Configuration for the Sibyl pipeline
//!
//! One TOML file (`sibyl.toml`), loaded once at startup and passed into
//! the pipeline constructor by value. No component re-reads configuration
//! mid-query; persistence of edits is a caller concern.
//!
//! ```toml
//! [llm]
//! provider = "openai"
//! model = "gpt-4o-mini"
//!
//! [embedding]
//! provider = "ollama"
//!
//! [database]
//! kind = "sqlite"
//! path = "demo.db"
//! ```

mod components;
mod defaults;
mod error;

pub use components::database::DatabaseConfig;
pub use components::embedding::{EmbeddingConfig, EmbeddingProviderType};
pub use components::llm::{LlmConfig, LlmProviderType};
pub use components::retrieval::RetrievalConfig;
pub use components::store::StoreConfig;
pub use error::{ConfigError, ConfigResult};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level configuration, one section per collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation backend selection and parameters
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding provider selection and parameters
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// The user database queries run against
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Context index location
    #[serde(default)]
    pub store: StoreConfig,
    /// Retrieval tuning (k per collection, prompt budget)
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        self.llm.validate()?;
        self.embedding.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }
}
