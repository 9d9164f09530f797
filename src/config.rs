/*!
 * Plugin Configuration
 * Pipe and handle-space sizing with env and JSON overrides
 */

use crate::core::limits::{
    DEFAULT_HANDLE_LIMIT, DEFAULT_PIPE_CAPACITY, ENV_HANDLE_LIMIT, ENV_PIPE_CAPACITY,
    MAX_PIPE_CAPACITY, MIN_HANDLE_LIMIT,
};
use crate::core::types::{Handle, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    #[diagnostic(
        code(config::invalid_value),
        help("pipe_capacity must be within 1..=1048576 and handle_limit must be at least 2.")
    )]
    InvalidValue { key: String, value: String },

    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(code(config::parse), help("Configuration must be a JSON object."))]
    Parse(String),
}

/// Session-wide sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PluginConfig {
    /// Bytes each fake pipe can hold
    pub pipe_capacity: Size,
    /// Handles are allocated from `0..handle_limit`
    pub handle_limit: Handle,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
            handle_limit: DEFAULT_HANDLE_LIMIT,
        }
    }
}

impl PluginConfig {
    /// Defaults overridden by `PLUGIN_PIPE_CAPACITY` and `PLUGIN_HANDLE_LIMIT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(capacity) = env_override(ENV_PIPE_CAPACITY)? {
            config.pipe_capacity = capacity;
        }
        if let Some(limit) = env_override(ENV_HANDLE_LIMIT)? {
            config.handle_limit = limit;
        }
        config.validate()
    }

    /// Parse a JSON object; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    pub fn with_pipe_capacity(mut self, capacity: Size) -> Self {
        self.pipe_capacity = capacity;
        self
    }

    pub fn with_handle_limit(mut self, limit: Handle) -> Self {
        self.handle_limit = limit;
        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.pipe_capacity == 0 || self.pipe_capacity > MAX_PIPE_CAPACITY {
            return Err(ConfigError::InvalidValue {
                key: "pipe_capacity".to_string(),
                value: self.pipe_capacity.to_string(),
            });
        }
        if self.handle_limit < MIN_HANDLE_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "handle_limit".to_string(),
                value: self.handle_limit.to_string(),
            });
        }
        Ok(self)
    }
}

fn env_override<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = PluginConfig::default().validate().unwrap();
        assert_eq!(config.pipe_capacity, 64 * 1024);
        assert_eq!(config.handle_limit, 201);
    }

    #[test]
    fn test_json_partial_override() {
        let config = PluginConfig::from_json(r#"{"pipe_capacity": 128}"#).unwrap();
        assert_eq!(
            config,
            PluginConfig {
                pipe_capacity: 128,
                handle_limit: DEFAULT_HANDLE_LIMIT,
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            PluginConfig::default().with_pipe_capacity(0).validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            PluginConfig::default().with_handle_limit(1).validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            PluginConfig::from_json(r#"{"pipe_capacity": "big"}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
