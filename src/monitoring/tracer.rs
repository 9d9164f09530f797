/*!
 * Structured Tracing
 * Subscriber setup and per-call spans for the synchronous call bridge
 */

use crate::core::limits::ENV_TRACE_JSON;
use crate::core::types::CallId;
use std::time::{Duration, Instant};
use tracing::{debug, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Calls slower than this are reported at warn level
const SLOW_CALL_THRESHOLD: Duration = Duration::from_millis(500);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PLUGIN_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = use_json, "Structured tracing initialized");
    }
}

/// Span covering one blocking bridge call, from submission to reply
pub struct CallSpan {
    span: tracing::Span,
    start: Instant,
    call_id: CallId,
}

impl CallSpan {
    pub fn new(call_id: CallId, request_len: usize) -> Self {
        let span = span!(
            Level::DEBUG,
            "bridge_call",
            call_id = call_id,
            request_len = request_len,
            reply_len = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            call_id,
        }
    }

    pub fn record_reply(&self, reply_len: usize) {
        self.span.record("reply_len", reply_len);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_CALL_THRESHOLD {
            warn!(
                call_id = self.call_id,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow bridge call"
            );
        } else {
            debug!(call_id = self.call_id, "bridge call completed");
        }
    }
}
