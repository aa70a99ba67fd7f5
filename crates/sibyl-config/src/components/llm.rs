//! Generation backend configuration

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

/// Which text-generation service to use.
///
/// Selected once at configuration time; the pipeline never re-dispatches
/// per call. `openai` covers every OpenAI-compatible relay (DeepSeek,
/// MiniMax, Qwen) via a custom `endpoint`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// OpenAI-compatible chat completions API
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Local Ollama instance
    Ollama,
    /// Anthropic messages API
    Anthropic,
}

impl LlmProviderType {
    /// Default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProviderType::OpenAi => "https://api.openai.com/v1",
            LlmProviderType::Ollama => "http://localhost:11434",
            LlmProviderType::Anthropic => "https://api.anthropic.com",
        }
    }

    /// Default chat model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProviderType::OpenAi => defaults::DEFAULT_CHAT_MODEL,
            LlmProviderType::Ollama => "llama3",
            LlmProviderType::Anthropic => "claude-sonnet-4-5",
        }
    }

    /// Whether this provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmProviderType::Ollama)
    }

    /// Environment variable consulted when no key is configured
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            LlmProviderType::OpenAi => Some("OPENAI_API_KEY"),
            LlmProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
            LlmProviderType::Ollama => None,
        }
    }
}

/// Generation backend settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider selection
    #[serde(default)]
    pub provider: LlmProviderType,
    /// Chat model name; provider default when unset
    pub model: Option<String>,
    /// API key; falls back to the provider's environment variable
    pub api_key: Option<String>,
    /// Endpoint URL override (relay/proxy or non-default Ollama host)
    pub endpoint: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Deadline for one backend call, in seconds
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    /// Endpoint, using the provider default when unset
    pub fn llm_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint().to_string())
    }

    /// Chat model, using the provider default when unset
    pub fn chat_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Configured key, or the provider's environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| self.provider.api_key_env_var().and_then(|var| std::env::var(var).ok()))
    }

    /// Temperature, defaulting to 0 for reproducible SQL
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(defaults::DEFAULT_TEMPERATURE)
    }

    /// Max generated tokens
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(defaults::DEFAULT_MAX_TOKENS)
    }

    /// Backend call deadline in seconds
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(defaults::DEFAULT_TIMEOUT_SECS)
    }

    /// Range-check the tunables
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid(format!(
                    "llm.temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "llm.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
