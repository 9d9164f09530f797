/*!
 * Bridge Types
 * Errors, per-call state, and statistics for the call bridge
 */

use crate::core::types::{CallId, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bridge error types
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum BridgeError {
    #[error("Synchronous call issued from the designated thread")]
    #[diagnostic(
        code(bridge::designated_thread),
        help("The designated thread must never block. Issue the call from a worker thread.")
    )]
    CalledFromDesignatedThread,

    #[error("Malformed reply message: {0}")]
    #[diagnostic(
        code(bridge::malformed_reply),
        help("Replies must have the form \"<id>:<payload>\" with a decimal id.")
    )]
    MalformedReply(String),
}

/// Where a correlation id is in its lifecycle
///
/// `Submitted -> HandedOff -> Replied -> Consumed`; ids never move backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// Queued in the outbox, not yet drained
    Submitted,
    /// Sent to the outside world, reply not yet delivered
    HandedOff,
    /// Reply waiting in the inbox for its caller
    Replied,
    /// Reply claimed by the caller
    Consumed,
    /// Never issued
    Unknown,
}

/// Bridge statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BridgeStats {
    pub next_id: CallId,
    pub pending_outbound: Size,
    pub pending_inbound: Size,
}
