/*!
 * Bridge Module
 * Synchronous calls from worker threads onto the host's designated thread
 */

pub mod caller;
pub mod envelope;
pub mod event_loop;
pub mod traits;
pub mod types;

// Re-export public API
pub use caller::SyncCallBridge;
pub use envelope::FramedTransport;
pub use event_loop::{EventLoop, EventLoopHandle};
pub use traits::{Dispatcher, Transport, Work};
pub use types::{BridgeError, BridgeStats, CallState};
