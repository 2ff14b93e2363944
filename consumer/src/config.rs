//! Environment-driven configuration for the consumer binary.

use crate::error::ConfigError;

/// Variable holding the provider's base URI.
pub const BASE_URI_VAR: &str = "CONSUMER_BASE_URI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    pub base_uri: String,
}

impl ConsumerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_uri = lookup(BASE_URI_VAR).ok_or(ConfigError::Missing(BASE_URI_VAR))?;
        let base_uri = base_uri.trim();
        if base_uri.is_empty() {
            return Err(ConfigError::Empty(BASE_URI_VAR));
        }
        Ok(Self {
            base_uri: base_uri.to_string(),
        })
    }
}
