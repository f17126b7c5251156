//! Logging Infrastructure
//!
//! Structured logging setup. `RUST_LOG` takes precedence when set;
//! otherwise the configured level applies to the whole server.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with stderr output only
pub fn init_logger(log_level: &str) {
    init_logger_with_file(log_level, None);
}

/// Initialize the logger, optionally adding daily-rolling file output
///
/// File output is only enabled when `log_dir` points at an existing
/// directory; a missing directory falls back to stderr silently so a
/// misconfigured station still logs somewhere.
pub fn init_logger_with_file(log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, "flock-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
