/*!
 * Channel Registry
 * Descriptor table mapping handles to fake pipe ends
 */

use super::channel::BoundedByteChannel;
use super::types::{ChannelError, ChannelStats, Side, DEFAULT_HANDLE_LIMIT, DEFAULT_PIPE_CAPACITY};
use crate::config::PluginConfig;
use crate::core::types::{Handle, Size};
use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct HandleTable {
    readers: AHashMap<Handle, Arc<BoundedByteChannel>>,
    writers: AHashMap<Handle, Arc<BoundedByteChannel>>,
}

impl HandleTable {
    fn is_live(&self, handle: Handle) -> bool {
        self.readers.contains_key(&handle) || self.writers.contains_key(&handle)
    }

    /// Lowest two unused handles below `limit`, or None if fewer than two remain
    fn free_pair(&self, limit: Handle) -> Option<(Handle, Handle)> {
        let mut free = (0..limit).filter(|&h| !self.is_live(h));
        let read = free.next()?;
        let write = free.next()?;
        Some((read, write))
    }
}

/// Channel registry
///
/// The table lock only covers lookups and inserts. Reads and writes clone
/// the channel's `Arc` out of the table and release the lock before
/// touching the buffer, so a blocked transfer never stalls the table.
pub struct ChannelRegistry {
    table: Arc<Mutex<HandleTable>>,
    capacity: Size,
    handle_limit: Handle,
}

impl ChannelRegistry {
    pub fn new(capacity: Size, handle_limit: Handle) -> Self {
        info!(
            "Channel registry initialized (pipe capacity: {} bytes, handle limit: {})",
            capacity, handle_limit
        );
        Self {
            table: Arc::new(Mutex::new(HandleTable::default())),
            capacity,
            handle_limit,
        }
    }

    pub fn with_config(config: &PluginConfig) -> Self {
        Self::new(config.pipe_capacity, config.handle_limit)
    }

    /// Allocate a fresh pipe and return `(read_handle, write_handle)`
    ///
    /// Nothing is inserted unless both handles are available.
    pub fn create_pair(&self) -> Result<(Handle, Handle), ChannelError> {
        let channel = Arc::new(BoundedByteChannel::new(self.capacity)?);
        let mut table = self.table.lock();

        let Some((read, write)) = table.free_pair(self.handle_limit) else {
            warn!(
                "Pipe: ran out of handles ({} live, limit {})",
                table.readers.len() + table.writers.len(),
                self.handle_limit
            );
            return Err(ChannelError::ResourceExhausted {
                limit: self.handle_limit,
            });
        };

        table.readers.insert(read, Arc::clone(&channel));
        table.writers.insert(write, channel);

        info!(
            "Created pipe (read handle: {}, write handle: {}, capacity: {} bytes)",
            read, write, self.capacity
        );
        Ok((read, write))
    }

    fn lookup(&self, handle: Handle, side: Side) -> Result<Arc<BoundedByteChannel>, ChannelError> {
        let table = self.table.lock();
        let map = match side {
            Side::Read => &table.readers,
            Side::Write => &table.writers,
        };
        map.get(&handle).cloned().ok_or_else(|| {
            debug!("No such {} handle: {}", side, handle);
            ChannelError::NotFound(handle)
        })
    }

    pub fn read_from(&self, handle: Handle, buf: &mut [u8]) -> Result<Size, ChannelError> {
        let channel = self.lookup(handle, Side::Read)?;
        channel.read(buf)
    }

    pub fn write_to(&self, handle: Handle, data: &[u8]) -> Result<Size, ChannelError> {
        let channel = self.lookup(handle, Side::Write)?;
        channel.write(data)
    }

    /// Apply the non-blocking flag to whichever end `handle` names
    ///
    /// The write side is resolved first.
    pub fn set_nonblocking(&self, handle: Handle, nonblocking: bool) -> Result<Side, ChannelError> {
        let (channel, side) = {
            let table = self.table.lock();
            if let Some(channel) = table.writers.get(&handle) {
                (Arc::clone(channel), Side::Write)
            } else if let Some(channel) = table.readers.get(&handle) {
                (Arc::clone(channel), Side::Read)
            } else {
                debug!("Missing pipe for set_nonblocking handle {}", handle);
                return Err(ChannelError::NotFound(handle));
            }
        };

        match side {
            Side::Read => channel.set_read_nonblocking(nonblocking),
            Side::Write => channel.set_write_nonblocking(nonblocking),
        }
        debug!(
            "Handle {} ({} end) nonblocking = {}",
            handle, side, nonblocking
        );
        Ok(side)
    }

    /// Retire one end of a pipe and free its handle for reuse
    ///
    /// The pipe itself is dropped once both ends are closed and no
    /// in-flight transfer still holds it.
    pub fn close(&self, handle: Handle) -> Result<Side, ChannelError> {
        let (channel, side) = {
            let mut table = self.table.lock();
            if let Some(channel) = table.writers.remove(&handle) {
                (channel, Side::Write)
            } else if let Some(channel) = table.readers.remove(&handle) {
                (channel, Side::Read)
            } else {
                return Err(ChannelError::NotFound(handle));
            }
        };

        match side {
            Side::Read => channel.close_reader(),
            Side::Write => channel.close_writer(),
        }
        info!("Closed {} end of pipe (handle {})", side, handle);
        Ok(side)
    }

    pub fn stats(&self, handle: Handle) -> Result<ChannelStats, ChannelError> {
        let channel = self
            .lookup(handle, Side::Write)
            .or_else(|_| self.lookup(handle, Side::Read))?;
        Ok(channel.stats())
    }

    /// All live handles, sorted ascending
    pub fn live_handles(&self) -> Vec<Handle> {
        let table = self.table.lock();
        let mut handles: Vec<Handle> = table
            .readers
            .keys()
            .chain(table.writers.keys())
            .copied()
            .collect();
        handles.sort_unstable();
        handles
    }

    pub fn handle_limit(&self) -> Handle {
        self.handle_limit
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PIPE_CAPACITY, DEFAULT_HANDLE_LIMIT)
    }
}

impl Clone for ChannelRegistry {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table), // Share the table so handles stay unique across clones
            capacity: self.capacity,
            handle_limit: self.handle_limit,
        }
    }
}
