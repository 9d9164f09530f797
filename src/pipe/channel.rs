/*!
 * Bounded Byte Channel
 * Fake pipe core: ringbuf-backed circular buffer with blocking and
 * non-blocking partial-transfer semantics
 */

use super::types::{ChannelError, ChannelStats, MAX_PIPE_CAPACITY};
use crate::core::types::Size;
use parking_lot::{Condvar, Mutex};
use ringbuf::{traits::*, HeapRb};

/// State guarded by the channel lock
struct ChannelState {
    buffer: HeapRb<u8>,
    read_nonblocking: bool,
    write_nonblocking: bool,
    reader_closed: bool,
    writer_closed: bool,
}

/// Unidirectional byte pipe shared by one read end and one write end
///
/// Every state change happens under a single lock, and every change in
/// occupancy or mode wakes all waiters. Suspended readers and writers
/// re-check both the buffer and their non-blocking flag after each wake.
pub struct BoundedByteChannel {
    state: Mutex<ChannelState>,
    changed: Condvar,
    capacity: Size,
}

impl std::fmt::Debug for BoundedByteChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("BoundedByteChannel")
            .field("capacity", &stats.capacity)
            .field("buffered_bytes", &stats.buffered)
            .field("read_nonblocking", &stats.read_nonblocking)
            .field("write_nonblocking", &stats.write_nonblocking)
            .field("reader_closed", &stats.reader_closed)
            .field("writer_closed", &stats.writer_closed)
            .finish()
    }
}

impl BoundedByteChannel {
    /// Create an empty channel with both ends in blocking mode
    pub fn new(capacity: Size) -> Result<Self, ChannelError> {
        if capacity == 0 || capacity > MAX_PIPE_CAPACITY {
            return Err(ChannelError::InvalidCapacity(capacity));
        }

        Ok(Self {
            state: Mutex::new(ChannelState {
                buffer: HeapRb::<u8>::new(capacity),
                read_nonblocking: false,
                write_nonblocking: false,
                reader_closed: false,
                writer_closed: false,
            }),
            changed: Condvar::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> Size {
        self.capacity
    }

    /// Bytes currently held
    pub fn buffered(&self) -> Size {
        self.state.lock().buffer.occupied_len()
    }

    /// Write all of `data`, blocking for space unless the write end is non-blocking
    ///
    /// In non-blocking mode a full pipe ends the call early: the partial count
    /// is returned, or `WouldBlock` if nothing at all was written.
    pub fn write(&self, data: &[u8]) -> Result<Size, ChannelError> {
        let mut state = self.state.lock();
        let mut written = 0;

        while written < data.len() {
            if state.reader_closed {
                return if written > 0 {
                    Ok(written)
                } else {
                    Err(ChannelError::BrokenPipe)
                };
            }

            let pushed = state.buffer.push_slice(&data[written..]);
            if pushed > 0 {
                written += pushed;
                // Readers may be able to make progress now
                self.changed.notify_all();
                continue;
            }

            if state.write_nonblocking {
                return if written > 0 {
                    Ok(written)
                } else {
                    Err(ChannelError::WouldBlock)
                };
            }

            self.changed.wait(&mut state);
        }

        Ok(written)
    }

    /// Fill all of `buf`, blocking for data unless the read end is non-blocking
    ///
    /// Once the write end is closed an empty pipe reports end-of-file: the
    /// bytes read so far are returned, possibly `Ok(0)`.
    pub fn read(&self, buf: &mut [u8]) -> Result<Size, ChannelError> {
        let mut state = self.state.lock();
        let mut read = 0;

        while read < buf.len() {
            let popped = state.buffer.pop_slice(&mut buf[read..]);
            if popped > 0 {
                read += popped;
                // Writers may be able to make progress now
                self.changed.notify_all();
                continue;
            }

            if state.writer_closed {
                return Ok(read);
            }

            if state.read_nonblocking {
                return if read > 0 {
                    Ok(read)
                } else {
                    Err(ChannelError::WouldBlock)
                };
            }

            self.changed.wait(&mut state);
        }

        Ok(read)
    }

    pub fn set_read_nonblocking(&self, nonblocking: bool) {
        let mut state = self.state.lock();
        state.read_nonblocking = nonblocking;
        self.changed.notify_all();
    }

    pub fn set_write_nonblocking(&self, nonblocking: bool) {
        let mut state = self.state.lock();
        state.write_nonblocking = nonblocking;
        self.changed.notify_all();
    }

    /// Retire the read end; pending and future writes see a broken pipe
    pub fn close_reader(&self) {
        let mut state = self.state.lock();
        state.reader_closed = true;
        self.changed.notify_all();
    }

    /// Retire the write end; readers drain what is left, then see end-of-file
    pub fn close_writer(&self) {
        let mut state = self.state.lock();
        state.writer_closed = true;
        self.changed.notify_all();
    }

    pub fn stats(&self) -> ChannelStats {
        let state = self.state.lock();
        ChannelStats {
            capacity: self.capacity,
            buffered: state.buffer.occupied_len(),
            read_nonblocking: state.read_nonblocking,
            write_nonblocking: state.write_nonblocking,
            reader_closed: state.reader_closed,
            writer_closed: state.writer_closed,
        }
    }
}
