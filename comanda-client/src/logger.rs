//! Logging Infrastructure
//!
//! Library code only emits `tracing` events; binaries call [`init_logger`]
//! once at startup.

use tracing_subscriber::EnvFilter;

/// Initialize the logger with a default level
///
/// `RUST_LOG` wins over `log_level` when set. Calling it twice is harmless.
pub fn init_logger(log_level: Option<&str>) {
    init_logger_with_format(log_level, false);
}

/// Initialize the logger, optionally emitting JSON lines
pub fn init_logger_with_format(log_level: Option<&str>, json: bool) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}
