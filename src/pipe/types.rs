/*!
 * Pipe Types
 * Common types and errors for fake pipes
 */

use crate::core::types::{Handle, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::core::limits::{DEFAULT_HANDLE_LIMIT, DEFAULT_PIPE_CAPACITY, MAX_PIPE_CAPACITY};

/// Pipe error types
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum ChannelError {
    /// Non-blocking transfer could not move a single byte
    #[error("Operation would block")]
    #[diagnostic(
        code(pipe::would_block),
        help("The pipe is in non-blocking mode and has no data (read) or no space (write). Retry later.")
    )]
    WouldBlock,

    #[error("Handle {0} is not open on the requested side")]
    #[diagnostic(
        code(pipe::not_found),
        help("The handle was never allocated, was closed, or belongs to the other end of the pipe.")
    )]
    NotFound(Handle),

    #[error("Handle space exhausted (limit {limit})")]
    #[diagnostic(
        code(pipe::resource_exhausted),
        help("No two free handles remain. Close unused pipe ends before creating more.")
    )]
    ResourceExhausted { limit: u32 },

    /// Write attempted after the read end was retired
    #[error("Broken pipe")]
    #[diagnostic(
        code(pipe::broken_pipe),
        help("The read end of this pipe has been closed; no reader will ever consume the data.")
    )]
    BrokenPipe,

    #[error("Invalid pipe capacity: {0}")]
    #[diagnostic(
        code(pipe::invalid_capacity),
        help("Pipe capacity must be at least 1 byte and no more than MAX_PIPE_CAPACITY.")
    )]
    InvalidCapacity(Size),
}

/// Which end of a pipe a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Read,
    Write,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Read => f.write_str("read"),
            Side::Write => f.write_str("write"),
        }
    }
}

/// Pipe statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelStats {
    pub capacity: Size,
    pub buffered: Size,
    pub read_nonblocking: bool,
    pub write_nonblocking: bool,
    pub reader_closed: bool,
    pub writer_closed: bool,
}

impl ChannelStats {
    /// Bytes that can be written before the pipe is full
    #[inline]
    #[must_use]
    pub fn available_space(&self) -> Size {
        self.capacity - self.buffered
    }
}
