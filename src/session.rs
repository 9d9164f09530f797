/*!
 * Plugin Session
 * Explicitly owned registry, bridge, and shims for one plugin instance
 */

use crate::bridge::{Dispatcher, SyncCallBridge, Transport};
use crate::config::PluginConfig;
use crate::core::errors::PluginResult;
use crate::pipe::ChannelRegistry;
use crate::shim::{PosixPipes, UsbShim};
use tracing::info;

/// Everything one plugin instance needs, built once and passed around
///
/// Clones share state; it is released with the last clone.
#[derive(Clone)]
pub struct PluginSession {
    config: PluginConfig,
    registry: ChannelRegistry,
    bridge: SyncCallBridge,
}

impl PluginSession {
    pub fn new(
        config: PluginConfig,
        dispatcher: impl Dispatcher + 'static,
        transport: impl Transport + 'static,
    ) -> PluginResult<Self> {
        let config = config.validate()?;
        let registry = ChannelRegistry::with_config(&config);
        let bridge = SyncCallBridge::new(dispatcher, transport);

        info!(
            pipe_capacity = config.pipe_capacity,
            handle_limit = config.handle_limit,
            "Plugin session initialized"
        );
        Ok(Self {
            config,
            registry,
            bridge,
        })
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn bridge(&self) -> &SyncCallBridge {
        &self.bridge
    }

    pub fn posix(&self) -> PosixPipes {
        PosixPipes::new(self.registry.clone())
    }

    pub fn usb(&self) -> UsbShim {
        UsbShim::new(self.bridge.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::Work;
    use crate::core::errors::PluginError;
    use crate::core::types::CallId;

    struct Noop;

    impl Dispatcher for Noop {
        fn post(&self, _work: Work) {}
    }

    impl Transport for Noop {
        fn send(&self, _id: CallId, _request: &str) {}
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PluginConfig::default().with_handle_limit(0);
        let result = PluginSession::new(config, Noop, Noop);
        assert!(matches!(result, Err(PluginError::Config(_))));
    }

    #[test]
    fn test_shims_share_registry() {
        let config = PluginConfig::default().with_pipe_capacity(16);
        let session = PluginSession::new(config, Noop, Noop).unwrap();
        assert_eq!(session.config(), &config);

        let posix = session.posix();
        let [read, write] = posix.pipe().unwrap();
        assert_eq!(session.registry().live_handles(), vec![read, write]);
        assert_eq!(posix.registry().live_handles(), vec![read, write]);
        assert_eq!(session.registry().stats(read).unwrap().capacity, 16);
    }
}
