//! # Structured Logging
//!
//! Environment-aware logging that writes human-readable output to the
//! console and JSON lines to a per-process file. The file layer is what
//! makes absorbed side-effect failures diagnosable after the fact: a
//! mutation can succeed while its analytics or publish leg timed out, and
//! the only trace of that is the `warn` record.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();
static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize console and JSON file logging once per process.
///
/// Repeat calls are no-ops, as is calling this after the embedder already
/// installed a global subscriber. `RUST_LOG` overrides the per-environment
/// default filter. When the log directory cannot be created the file layer
/// is skipped and logging stays console-only.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let log_dir = log_directory();

        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_filter(env_filter(&environment));

        let file_layer = build_file_writer(&log_dir, &environment).map(|(writer, guard)| {
            // Keep the guard alive for the process lifetime so buffered
            // records are flushed on shutdown
            let _ = FILE_WRITER_GUARD.set(guard);
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_filter(env_filter(&environment))
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already installed, keeping it");
        }

        tracing::info!(
            environment = %environment,
            log_dir = %log_dir.display(),
            "structured logging initialized"
        );
    });
}

/// Resolve the runtime environment from `TASKLANE_ENV`, then `APP_ENV`,
/// defaulting to `development`.
pub fn detect_environment() -> String {
    std::env::var("TASKLANE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Create the log directory and a non-blocking writer into it.
///
/// Returns `None` when the directory cannot be created; the caller degrades
/// to console-only logging.
fn build_file_writer(log_dir: &Path, environment: &str) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(err) = fs::create_dir_all(log_dir) {
        eprintln!(
            "tasklane: cannot create log directory {}: {err}",
            log_dir.display()
        );
        return None;
    }

    let appender = tracing_appender::rolling::never(log_dir, log_file_name(environment));
    Some(tracing_appender::non_blocking(appender))
}

/// Per-process log file name: `<environment>.<pid>.<timestamp>.log`.
fn log_file_name(environment: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    format!("{environment}.{}.{timestamp}.log", process::id())
}

fn log_directory() -> PathBuf {
    std::env::var("TASKLANE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("log"))
}

fn env_filter(environment: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(environment)))
}

fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
