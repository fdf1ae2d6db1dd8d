/// Logging setup: daily-rolling log file under the data home.
///
/// The game owns the terminal in raw mode, so there is no console layer;
/// everything goes to `~/.local/share/girder/logs/girder.log.<date>`.
/// Default filter is `info,girder=debug`, overridable with RUST_LOG.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use girder::config::data_home;

pub fn logs_dir() -> PathBuf {
    data_home()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the global subscriber. Keep the guard alive until exit or the
/// last buffered lines are lost.
pub fn init_logging() -> Option<WorkerGuard> {
    let logs_dir = logs_dir();
    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: could not create {}: {e}", logs_dir.display());
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "girder.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,girder=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Some(guard)
}
