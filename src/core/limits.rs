/*!
 * System Limits and Constants
 *
 * Centralized location for plugin-wide limits and protocol constants.
 * Organized by domain for maintainability and discoverability.
 *
 * - Linux-compatible values are marked with [LINUX-COMPAT]
 * - Performance-critical constants are marked with [PERF]
 */

// =============================================================================
// PIPE LIMITS
// =============================================================================

/// Default fake pipe capacity (64KB)
/// [LINUX-COMPAT] Matches the default Linux pipe buffer size
pub const DEFAULT_PIPE_CAPACITY: usize = 64 * 1024;

/// Largest capacity a single fake pipe may be configured with (1MB)
/// [LINUX-COMPAT] Matches /proc/sys/fs/pipe-max-size
pub const MAX_PIPE_CAPACITY: usize = 1024 * 1024;

/// Size of the descriptor space handed out by the channel registry
/// Handles are numbered 0..DEFAULT_HANDLE_LIMIT, so the highest live
/// descriptor is 200
pub const DEFAULT_HANDLE_LIMIT: u32 = 201;

/// Smallest usable descriptor space (one read end plus one write end)
pub const MIN_HANDLE_LIMIT: u32 = 2;

// =============================================================================
// BRIDGE PROTOCOL
// =============================================================================

/// Separator between the correlation id and the payload on the wire
pub const ENVELOPE_SEPARATOR: char = ':';

/// Request the USB shim forwards to enumerate attached devices
pub const USB_FIND_DEVICES_REQUEST: &str = "USB:FIND_DEVICES";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides [`DEFAULT_PIPE_CAPACITY`]
pub const ENV_PIPE_CAPACITY: &str = "PLUGIN_PIPE_CAPACITY";

/// Overrides [`DEFAULT_HANDLE_LIMIT`]
pub const ENV_HANDLE_LIMIT: &str = "PLUGIN_HANDLE_LIMIT";

/// Switches tracing output to JSON when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "PLUGIN_TRACE_JSON";
