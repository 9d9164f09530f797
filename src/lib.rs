/*!
 * Plugin Bridge Library
 * Fake OS primitives for a sandboxed scanning plugin: emulated pipes and a
 * synchronous call bridge onto the host's single designated thread
 */

pub mod bridge;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod pipe;
pub mod session;
pub mod shim;

// Re-exports
pub use bridge::{
    BridgeError, BridgeStats, CallState, Dispatcher, EventLoop, EventLoopHandle, SyncCallBridge,
    Transport, Work,
};
pub use config::{ConfigError, PluginConfig};
pub use crate::core::errors::{PluginError, PluginResult};
pub use crate::core::types::{CallId, Handle, Size};
pub use monitoring::init_tracing;
pub use pipe::{BoundedByteChannel, ChannelError, ChannelRegistry, ChannelStats, Side};
pub use session::PluginSession;
pub use shim::{PosixPipes, UsbShim};
