/*!
 * Synchronous Call Bridge
 * Blocking request/reply calls from worker threads onto the designated thread
 */

use super::envelope;
use super::traits::{Dispatcher, Transport};
use super::types::{BridgeError, BridgeStats, CallState};
use crate::core::types::CallId;
use crate::monitoring::CallSpan;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// Pending-call table, guarded by the bridge lock
#[derive(Default)]
struct Mailboxes {
    next_id: CallId,
    /// Submitted but not yet handed to the transport, ordered by id
    outbox: BTreeMap<CallId, String>,
    /// Replied but not yet claimed by the waiting caller
    inbox: BTreeMap<CallId, String>,
    /// Ids whose caller has not returned yet
    awaiting: BTreeSet<CallId>,
}

struct BridgeInner {
    mailboxes: Mutex<Mailboxes>,
    replied: Condvar,
    dispatcher: Box<dyn Dispatcher>,
    transport: Box<dyn Transport>,
}

impl BridgeInner {
    fn drain(&self) -> usize {
        let mut mailboxes = self.mailboxes.lock();
        let mut forwarded = 0;

        while let Some((id, request)) = mailboxes.outbox.pop_first() {
            // The transport may be slow or may re-enter the bridge
            MutexGuard::unlocked(&mut mailboxes, || self.transport.send(id, &request));
            forwarded += 1;
        }

        if forwarded > 0 {
            trace!(forwarded, "outbox drained");
        }
        forwarded
    }
}

/// Synchronous call bridge
///
/// Worker threads call [`SyncCallBridge::call`] and block. The designated
/// thread only ever runs [`SyncCallBridge::drain`] (scheduled through the
/// [`Dispatcher`]) and [`SyncCallBridge::handle_reply`]; neither of them
/// waits on anything but the short-lived bridge lock.
///
/// Clones share the same pending-call table.
#[derive(Clone)]
pub struct SyncCallBridge {
    inner: Arc<BridgeInner>,
}

impl SyncCallBridge {
    pub fn new(dispatcher: impl Dispatcher + 'static, transport: impl Transport + 'static) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                mailboxes: Mutex::new(Mailboxes::default()),
                replied: Condvar::new(),
                dispatcher: Box::new(dispatcher),
                transport: Box::new(transport),
            }),
        }
    }

    /// Send `request` to the outside world and block until its reply arrives
    ///
    /// There is no timeout: if the host never drains or never replies, the
    /// caller waits forever.
    pub fn call(&self, request: &str) -> Result<String, BridgeError> {
        if self.inner.dispatcher.is_designated_thread() {
            return Err(BridgeError::CalledFromDesignatedThread);
        }

        let mut mailboxes = self.inner.mailboxes.lock();
        let id = mailboxes.next_id;
        mailboxes.next_id += 1;
        mailboxes.outbox.insert(id, request.to_owned());
        mailboxes.awaiting.insert(id);

        let span = CallSpan::new(id, request.len());
        let _entered = span.enter();
        debug!(call_id = id, "request queued");

        let inner = Arc::clone(&self.inner);
        MutexGuard::unlocked(&mut mailboxes, || {
            self.inner.dispatcher.post(Box::new(move || {
                inner.drain();
            }))
        });

        let reply = loop {
            if let Some(reply) = mailboxes.inbox.remove(&id) {
                break reply;
            }
            self.inner.replied.wait(&mut mailboxes);
        };
        mailboxes.awaiting.remove(&id);
        drop(mailboxes);

        span.record_reply(reply.len());
        Ok(reply)
    }

    /// Forward every queued request to the transport, lowest id first
    ///
    /// Runs on the designated thread. Draining an empty outbox is a no-op.
    /// Returns how many requests were forwarded.
    pub fn drain(&self) -> usize {
        self.inner.drain()
    }

    /// Deliver the reply for `id` and wake every waiting caller
    ///
    /// Replies for ids nobody is waiting on are kept but never claimed.
    pub fn handle_reply(&self, id: CallId, reply: impl Into<String>) {
        let mut mailboxes = self.inner.mailboxes.lock();
        if !mailboxes.awaiting.contains(&id) {
            debug!(call_id = id, "reply for an id with no waiting caller");
        }
        mailboxes.inbox.insert(id, reply.into());
        self.inner.replied.notify_all();
    }

    /// Parse a `"<id>:<reply>"` message from the host and deliver it
    pub fn handle_reply_message(&self, message: &str) -> Result<CallId, BridgeError> {
        let (id, reply) = envelope::decode(message)?;
        self.handle_reply(id, reply);
        Ok(id)
    }

    pub fn call_state(&self, id: CallId) -> CallState {
        let mailboxes = self.inner.mailboxes.lock();
        if id >= mailboxes.next_id {
            CallState::Unknown
        } else if mailboxes.outbox.contains_key(&id) {
            CallState::Submitted
        } else if mailboxes.inbox.contains_key(&id) && mailboxes.awaiting.contains(&id) {
            CallState::Replied
        } else if mailboxes.awaiting.contains(&id) {
            CallState::HandedOff
        } else {
            CallState::Consumed
        }
    }

    pub fn stats(&self) -> BridgeStats {
        let mailboxes = self.inner.mailboxes.lock();
        BridgeStats {
            next_id: mailboxes.next_id,
            pending_outbound: mailboxes.outbox.len(),
            pending_inbound: mailboxes.inbox.len(),
        }
    }
}
