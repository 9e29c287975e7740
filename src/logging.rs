//! # Structured Logging Module
//!
//! Environment-aware structured logging to the console and, when a log
//! directory is configured, to a JSON file per process.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

use crate::config::LoggingConfig;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let log_level = config
            .level
            .clone()
            .unwrap_or_else(|| default_log_level(environment).to_string());
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level))
        };

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(true)
            .with_filter(filter());

        let (file_layer, guard, log_path) = match open_log_file(config, environment) {
            Some((dir, file_name)) => {
                let appender = tracing_appender::rolling::never(&dir, &file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(filter());
                (Some(layer), Some(guard), Some(dir.join(file_name)))
            }
            None => (None, None, None),
        };

        // A subscriber may already be installed (tests, embedding binaries)
        if tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            log_file = ?log_path.as_ref().map(|p| p.display().to_string()),
            "Structured logging initialized"
        );

        // Keep the file writer alive for the life of the process
        if let Some(guard) = guard {
            std::mem::forget(guard);
        }
    });
}

/// Resolve the JSON log file location, creating the directory when needed
fn open_log_file(config: &LoggingConfig, environment: &str) -> Option<(PathBuf, String)> {
    if !config.json {
        return None;
    }
    let log_dir = PathBuf::from(config.log_dir.as_deref()?);

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!(
            "Failed to create log directory {}: {e}; logging to console only",
            log_dir.display()
        );
        return None;
    }

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{environment}.{}.{timestamp}.log", process::id());
    Some((log_dir, file_name))
}

/// Get log level based on environment
fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for item access decisions
///
/// `mutation` marks operations that write to the store, so refused writes can
/// be told apart from refused reads.
pub fn log_item_operation(
    operation: &str,
    mutation: bool,
    actor_id: Option<Uuid>,
    item_id: Option<Uuid>,
    outcome: &str,
) {
    tracing::info!(
        operation = %operation,
        mutation = mutation,
        actor_id = ?actor_id,
        item_id = ?item_id,
        outcome = %outcome,
        authenticated = actor_id.is_some(),
        "ITEM_OPERATION"
    );
}
