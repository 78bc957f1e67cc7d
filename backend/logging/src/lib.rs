//! Telemetry and structured logging components for cogforge.
//!
//! Handles subscriber setup (console + optional rolling NDJSON file) and
//! scrubbing of subscription keys and tokens before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{build_filter, init_logger};
pub use redact::redact_sensitive_data;
