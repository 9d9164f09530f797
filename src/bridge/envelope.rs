/*!
 * Correlation Envelope
 * `"<id>:<payload>"` framing for messages crossing the host boundary
 */

use super::traits::Transport;
use super::types::BridgeError;
use crate::core::limits::ENVELOPE_SEPARATOR;
use crate::core::types::CallId;

/// Frame a payload with its correlation id
#[inline]
#[must_use]
pub fn encode(id: CallId, payload: &str) -> String {
    format!("{}{}{}", id, ENVELOPE_SEPARATOR, payload)
}

/// Split a framed message at the first separator
///
/// The payload may itself contain the separator.
pub fn decode(message: &str) -> Result<(CallId, &str), BridgeError> {
    let (id, payload) = message
        .split_once(ENVELOPE_SEPARATOR)
        .ok_or_else(|| BridgeError::MalformedReply(message.to_string()))?;

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BridgeError::MalformedReply(message.to_string()));
    }
    let id = id
        .parse()
        .map_err(|_| BridgeError::MalformedReply(message.to_string()))?;
    Ok((id, payload))
}

/// Transport that frames each request and hands the string to a host sink
///
/// Mirrors a host whose only outbound primitive is "post this string".
pub struct FramedTransport<F>
where
    F: Fn(String) + Send + Sync,
{
    sink: F,
}

impl<F> FramedTransport<F>
where
    F: Fn(String) + Send + Sync,
{
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<F> Transport for FramedTransport<F>
where
    F: Fn(String) + Send + Sync,
{
    fn send(&self, id: CallId, request: &str) {
        (self.sink)(encode(id, request));
    }
}
