//! Tracing configuration and log routing.
//!
//! Logs go to stdout through a compact formatter and to a file sink. `MEDBRIEF_LOG_FILE` names
//! the file to append to (`off` disables the sink); without it the file logger writes
//! `logs/medbrief.log`. The file sink uses a non-blocking writer so request handlers never wait
//! on disk.
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "medbrief.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Installs a compact stdout layer and, when available, a file layer.
/// - Keeps the non-blocking writer guard alive for the process lifetime.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    if let Some(writer) = configure_file_writer() {
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact();

        registry.with(file_layer).init();
    } else {
        registry.init();
    }
}

/// Where file logs should go, derived from `MEDBRIEF_LOG_FILE`.
#[derive(Debug, PartialEq, Eq)]
enum FileSink {
    Disabled,
    Default,
    Path(String),
}

fn file_sink(setting: Option<&str>) -> FileSink {
    match setting.map(str::trim) {
        None | Some("") => FileSink::Default,
        Some(value) if value.eq_ignore_ascii_case("off") => FileSink::Disabled,
        Some(value) => FileSink::Path(value.to_string()),
    }
}

/// Build a non-blocking writer for file logging.
///
/// Returns `None` when file logging is switched off, or when the target cannot be opened.
fn configure_file_writer() -> Option<NonBlocking> {
    let setting = std::env::var("MEDBRIEF_LOG_FILE").ok();
    let (non_blocking, guard) = match file_sink(setting.as_deref()) {
        FileSink::Disabled => return None,
        FileSink::Path(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .inspect_err(|err| eprintln!("Failed to open log file {path}: {err}"))
                .ok()?;
            tracing_appender::non_blocking(file)
        }
        FileSink::Default => {
            std::fs::create_dir_all(DEFAULT_LOG_DIR)
                .inspect_err(|err| eprintln!("Failed to create logs directory: {err}"))
                .ok()?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(
                DEFAULT_LOG_DIR,
                DEFAULT_LOG_FILE,
            ))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Some(non_blocking)
}
