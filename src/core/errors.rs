/*!
 * Error Types
 * Plugin-level error umbrella over the per-module errors
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::bridge::BridgeError;
pub use crate::config::ConfigError;
pub use crate::pipe::ChannelError;

/// Plugin result type
pub type PluginResult<T> = Result<T, PluginError>;

/// Any error surfaced by the plugin core
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum PluginError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_keep_message() {
        let err: PluginError = ChannelError::NotFound(7).into();
        assert_eq!(err.to_string(), "Handle 7 is not open on the requested side");

        let err: PluginError = BridgeError::CalledFromDesignatedThread.into();
        assert!(matches!(err, PluginError::Bridge(_)));
    }

    #[test]
    fn test_serializes_tagged() {
        let err = PluginError::Channel(ChannelError::WouldBlock);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"error\":\"channel\""));
    }
}
