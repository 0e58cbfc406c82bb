//! File-based logging. The TUI owns the terminal, so nothing is written to
//! stdout or stderr once logging is up.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "finantui.log";

/// Installs a daily-rolling, non-blocking file subscriber under `log_dir`.
///
/// The filter comes from `RUST_LOG`, falling back to `level`. Returns `None`
/// (and logs nowhere) when the directory can't be created; the returned
/// guard must be held until exit so buffered lines get flushed.
pub(crate) fn init(log_dir: &Path, level: &str) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialized"
    );
    Some(guard)
}
