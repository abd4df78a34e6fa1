//! Tracing configuration and log routing.
//!
//! The server logs to stdout using a compact formatter and mirrors everything into a log file.
//! `RUSTY_DIGEST_LOG_FILE` selects the file; otherwise `logs/rusty-digest.log` is used. The file
//! layer goes through a non‑blocking writer so request handlers never wait on disk I/O.
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "rusty-digest.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Installs a compact stdout layer and, when the file can be opened, a file layer.
/// - Keeps the non‑blocking writer guard alive for the process lifetime.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let result = match configure_file_writer(log_file) {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).try_init()
        }
        None => registry.try_init(),
    };

    if let Err(err) = result {
        eprintln!("Tracing subscriber already installed: {err}");
    }
}

/// Build a non‑blocking writer for file logging.
///
/// Returns `None` when the log directory cannot be created or the target file cannot be opened.
fn configure_file_writer(log_file: Option<&Path>) -> Option<NonBlocking> {
    let writer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path);
            match file {
                Ok(file) => tracing_appender::non_blocking(file),
                Err(err) => {
                    eprintln!("Failed to open log file {}: {err}", path.display());
                    return None;
                }
            }
        }
        None => {
            if let Err(err) = std::fs::create_dir_all(DEFAULT_LOG_DIR) {
                eprintln!("Failed to create {DEFAULT_LOG_DIR} directory: {err}");
                return None;
            }
            let appender = tracing_appender::rolling::never(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE);
            tracing_appender::non_blocking(appender)
        }
    };

    let (non_blocking, guard) = writer;
    let _ = LOG_GUARD.set(guard);
    Some(non_blocking)
}
