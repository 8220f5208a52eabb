use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Sends `tracing` output to `path`. Stdout belongs to the terminal renderer,
/// so logs never go there.
///
/// The returned guard flushes the background writer when dropped and must be
/// kept alive for as long as logging is wanted.
pub fn init_file_logging(path: &Path, level: tracing::Level) -> WorkerGuard {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "pixmaze.log".into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    guard
}
