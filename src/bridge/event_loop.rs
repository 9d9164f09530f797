/*!
 * Designated Thread Event Loop
 * Single-threaded work loop implementing the bridge hand-off
 */

use super::traits::{Dispatcher, Work};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, info, warn};

enum LoopMessage {
    Run(Work),
    Shutdown,
}

/// Owns the designated thread
///
/// Every posted [`Work`] item runs on that one thread, in posting order.
/// Work items must not block: the thread stands in for a host event loop.
pub struct EventLoop {
    handle: EventLoopHandle,
    thread: Option<JoinHandle<()>>,
}

/// Cloneable dispatcher onto an [`EventLoop`]
#[derive(Clone)]
pub struct EventLoopHandle {
    sender: flume::Sender<LoopMessage>,
    thread_id: ThreadId,
}

impl EventLoop {
    pub fn spawn(name: &str) -> std::io::Result<Self> {
        let (sender, receiver) = flume::unbounded::<LoopMessage>();

        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut processed: u64 = 0;
                for message in receiver.iter() {
                    match message {
                        LoopMessage::Run(work) => {
                            work();
                            processed += 1;
                        }
                        LoopMessage::Shutdown => break,
                    }
                }
                debug!(processed, "event loop exiting");
            })?;

        let thread_id = thread.thread().id();
        info!(name, "Designated thread started");

        Ok(Self {
            handle: EventLoopHandle { sender, thread_id },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> EventLoopHandle {
        self.handle.clone()
    }

    pub fn thread_id(&self) -> ThreadId {
        self.handle.thread_id
    }

    /// Stop after the work already queued and wait for the thread to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.handle.sender.send(LoopMessage::Shutdown);
            if thread.join().is_err() {
                warn!("Designated thread panicked");
            }
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Dispatcher for EventLoopHandle {
    fn post(&self, work: Work) {
        if self.sender.send(LoopMessage::Run(work)).is_err() {
            warn!("Designated thread is gone; dropping posted work");
        }
    }

    fn is_designated_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}
