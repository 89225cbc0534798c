//! Frame sinks.
//!
//! Sinks consume extracted payloads in stream order and are driven by `Y4mExtractor::run`.

/// Generic frame sink trait and built-in sinks.
pub mod sink;
/// Sink that re-wraps payloads into a Y4M container.
pub mod y4m;
