//! Structured Logger
//!
//! Wraps `tracing` to provide human-readable console output, optional file
//! rotation (NDJSON), and environment-based level control.

use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the rolling log: `cogforge.log.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "cogforge.log";

/// `RUST_LOG` wins over the configured level; an unparsable level falls back to `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global structured logger.
///
/// Console output goes to stderr so stdout carries only reports. When
/// `log_dir` is set, a daily rolling JSON file is written there as well.
/// Calling this twice is a no-op. Fails when the log directory cannot be
/// created or opened.
pub fn init_logger(level: &str, log_dir: Option<&Path>) -> Result<(), InitError> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .build(dir)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    // Filter, console, and file
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
