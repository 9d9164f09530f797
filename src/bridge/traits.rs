/*!
 * Bridge Traits
 * Capabilities the host runtime supplies to the call bridge
 */

use crate::core::types::CallId;

/// Zero-argument action scheduled onto the designated thread
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Hand-off onto the single designated thread
pub trait Dispatcher: Send + Sync {
    /// Schedule `work` to run exactly once, asynchronously, on the designated thread
    ///
    /// Must not wait for `work` to run.
    fn post(&self, work: Work);

    /// Whether the calling thread is the designated thread
    fn is_designated_thread(&self) -> bool {
        false
    }
}

/// Outbound path to the outside world
pub trait Transport: Send + Sync {
    /// Deliver one correlated request; invoked only on the designated thread
    fn send(&self, id: CallId, request: &str);
}

impl<T: Dispatcher + ?Sized> Dispatcher for std::sync::Arc<T> {
    fn post(&self, work: Work) {
        (**self).post(work)
    }

    fn is_designated_thread(&self) -> bool {
        (**self).is_designated_thread()
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, id: CallId, request: &str) {
        (**self).send(id, request)
    }
}
