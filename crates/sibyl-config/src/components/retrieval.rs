//! Retrieval tuning

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

/// Top-k per collection and the prompt budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Top-k for the DDL collection
    #[serde(default = "default_n_results")]
    pub n_results_ddl: usize,
    /// Top-k for the documentation collection
    #[serde(default = "default_n_results")]
    pub n_results_documentation: usize,
    /// Top-k for the question→SQL example collection
    #[serde(default = "default_n_results")]
    pub n_results_sql: usize,
    /// Prompt budget in characters; lowest-ranked context items are
    /// dropped (whole, never mid-item) until the rendered prompt fits
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

fn default_n_results() -> usize {
    defaults::DEFAULT_N_RESULTS
}

fn default_max_prompt_chars() -> usize {
    defaults::DEFAULT_MAX_PROMPT_CHARS
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            n_results_ddl: default_n_results(),
            n_results_documentation: default_n_results(),
            n_results_sql: default_n_results(),
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

impl RetrievalConfig {
    /// Range-check the tunables
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_prompt_chars == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.max_prompt_chars must be greater than zero".to_string(),
            ));
        }
        for (key, value) in [
            ("retrieval.n_results_ddl", self.n_results_ddl),
            (
                "retrieval.n_results_documentation",
                self.n_results_documentation,
            ),
            ("retrieval.n_results_sql", self.n_results_sql),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_top_k_and_budget() {
        let config = RetrievalConfig::default();
        assert_eq!(config.n_results_ddl, 10);
        assert_eq!(config.n_results_documentation, 10);
        assert_eq!(config.n_results_sql, 10);
        assert_eq!(config.max_prompt_chars, 24_000);
    }

    #[test]
    fn zero_top_k_rejected() {
        let config = RetrievalConfig {
            n_results_documentation: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("n_results_documentation"));

        assert!(RetrievalConfig::default().validate().is_ok());
    }
}
