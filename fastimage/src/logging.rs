use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::Settings;

/// Initialize tracing on stderr, plus a log file when `log_to_file` is set.
///
/// Log files are written to ~/.cache/fastimage/logs/fastimage-YYYY-MM-DD-HH-MM-SS.log
/// and the returned path points at it.
pub fn init_logging(settings: &Settings) -> Result<Option<PathBuf>> {
    // Default to INFO, can be overridden with RUST_LOG env var
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    if !settings.log_to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let logs_dir = dirs::cache_dir()
        .ok_or(anyhow::anyhow!("Could not find cache directory"))?
        .join("fastimage")
        .join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_filename = format!("fastimage-{}.log", timestamp);
    let log_path = logs_dir.join(&log_filename);

    // Non-blocking so reporters on load threads never wait on disk
    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    // The guard flushes on drop; keep it for the lifetime of the process
    std::mem::forget(guard);

    Ok(Some(log_path))
}
