//! Configuration error type

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config file: {0}")]
    Io(String),

    /// TOML syntax or shape error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field value is out of range or a required field is missing
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
