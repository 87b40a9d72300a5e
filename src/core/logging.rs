//! Logging Module
//!
//! Library code logs through the `log` facade; this module routes it into
//! `tracing` and installs the subscriber:
//! - a human-readable stdout layer
//! - an optional JSON file layer with daily rotation

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingSettings;

/// Base name of the rolling log files.
pub const LOG_FILE_NAME: &str = "noun-forge.log";

/// `RUST_LOG` wins over the configured directive; an unparseable directive
/// falls back to `info`.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system.
///
/// Returns the file writer's `WorkerGuard` when file logging is enabled;
/// keep it alive for the lifetime of the process so buffered lines are
/// flushed on shutdown.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(true)
        .with_filter(env_filter(settings));

    let (file_layer, guard) = if settings.json_file {
        let log_dir = settings.log_dir();
        match file_writer(&log_dir) {
            Ok((writer, guard)) => {
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(true)
                    .with_filter(env_filter(settings));
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    // `try_init` also installs the `log` -> `tracing` bridge.
    let installed = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        // A subscriber already exists (tests); make sure `log` still reaches it.
        let _ = tracing_log::LogTracer::init();
    }

    if guard.is_some() {
        tracing::info!(
            "Logging initialized. Writing to: {:?} (daily rolling)",
            settings.log_dir().join(LOG_FILE_NAME)
        );
    }

    guard
}

fn file_writer(
    log_dir: &Path,
) -> io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    Ok(tracing_appender::non_blocking(file_appender))
}
