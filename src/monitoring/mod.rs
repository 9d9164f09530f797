/*!
 * Monitoring Module
 * Structured tracing for the plugin core
 */

pub mod tracer;

pub use tracer::{init_tracing, CallSpan};
