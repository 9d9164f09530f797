/*!
 * USB Shim
 * Device enumeration forwarded to the host through the call bridge
 */

use crate::bridge::{BridgeError, SyncCallBridge};
use crate::core::limits::USB_FIND_DEVICES_REQUEST;
use tracing::info;

/// USB entry points that need the host; everything else is a local stub
#[derive(Clone)]
pub struct UsbShim {
    bridge: SyncCallBridge,
}

impl UsbShim {
    pub fn new(bridge: SyncCallBridge) -> Self {
        Self { bridge }
    }

    /// Ask the host for attached devices and return its raw reply
    ///
    /// Blocks the calling worker thread until the host answers.
    pub fn find_devices(&self) -> Result<String, BridgeError> {
        let reply = self.bridge.call(USB_FIND_DEVICES_REQUEST)?;
        info!(reply = %reply, "get devices, got host reply");
        Ok(reply)
    }
}
