/*!
 * Pipe Module
 * POSIX-style fake pipes backed by in-process ring buffers
 */

pub mod channel;
pub mod registry;
pub mod types;

// Re-export public API
pub use channel::BoundedByteChannel;
pub use registry::ChannelRegistry;
pub use types::{ChannelError, ChannelStats, Side};
