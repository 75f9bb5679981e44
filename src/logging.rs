//! File-based tracing setup.
//!
//! The terminal owns stdout/stderr once the alternate screen is entered, so
//! everything goes to a rolling log file instead.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingSettings, default_log_dir};

/// Keeps the non-blocking log writer alive for the lifetime of the process.
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

/// Initialize file logging. Never fails: an unwritable log directory falls
/// back to the system temp dir, and a second init attempt is ignored.
pub fn init(settings: &LoggingSettings) -> LogGuard {
    let log_dir = settings
        .dir
        .clone()
        .or_else(default_log_dir)
        .unwrap_or_else(|| std::env::temp_dir().join("lyrebird-logs"));

    let log_dir = match fs::create_dir_all(&log_dir) {
        Ok(()) => log_dir,
        Err(_) => {
            let fallback = std::env::temp_dir().join("lyrebird-logs");
            let _ = fs::create_dir_all(&fallback);
            fallback
        }
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, "lyrebird.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match &settings.filter {
        Some(s) if !s.trim().is_empty() => EnvFilter::new(s),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);
    let _ = subscriber.try_init();
    tracing::info!(log_dir = %log_dir.display(), "logging initialized");

    LogGuard(Some(guard))
}
