use std::path::Path;

use anyhow::Context;
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::settings::AppConfig;

/// Target the access log middleware writes to; only the file layer listens on it.
pub const ACCESS_LOG_TARGET: &str = "access_log";

/// Keeps the access log writer alive. Dropping it flushes pending lines.
pub struct LogGuard {
    _access_log: WorkerGuard,
}

pub fn init_logging(config: &AppConfig) -> anyhow::Result<LogGuard> {
    let default_level = if config.is_production() { "info" } else { "debug" };

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .add_directive(format!("{ACCESS_LOG_TARGET}=off").parse()?);

    let console_layer = if config.is_production() {
        fmt::layer().json().with_filter(console_filter).boxed()
    } else {
        fmt::layer().with_filter(console_filter).boxed()
    };

    let (writer, guard) = tracing_appender::non_blocking(access_log_appender(&config.access_log_path)?);
    let access_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(Targets::new().with_target(ACCESS_LOG_TARGET, Level::INFO));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(access_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _access_log: guard })
}

/// Append-only file that is never rotated.
fn access_log_appender(path: &str) -> anyhow::Result<RollingFileAppender> {
    let path = Path::new(path);
    let directory = path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Access log path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .context("Failed to open access log")
}
