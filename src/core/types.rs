/*!
 * Core Types
 * Common types used across the plugin
 */

/// Descriptor-like handle naming one side of a fake pipe
pub type Handle = u32;

/// Correlation id tagging one bridge request/reply pair
pub type CallId = u64;

/// Size type for buffer operations
pub type Size = usize;
