//! Structured logging: tracing subscriber setup and NDJSON lines.

mod format;

pub use format::StructuredLogger;
