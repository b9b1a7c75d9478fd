//! Logging setup for Shade, built on `tracing`.
//!
//! [`init_minimal_logging`] installs a stderr subscriber driven by `RUST_LOG` and is
//! meant for early startup or as a fallback. [`init_logging`] installs the
//! configured subscriber: a stdout layer plus an optional daily-rolling file layer,
//! each in text or JSON format.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils::fs::ensure_dir_exists;

use once_cell::sync::Lazy;
use std::ffi::OsStr;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

const DEFAULT_LOG_FILE_NAME: &str = "shade.log";

/// Keeps the non-blocking file writer alive so buffered records are flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs a stderr subscriber filtered by `RUST_LOG` (default "info").
///
/// Does nothing if a global subscriber is already set.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, CoreError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        invalid => Err(LoggingError::InitializationFailure(format!("Invalid log level in config: {}", invalid)).into()),
    }
}

fn level_filter(level: Level) -> Result<EnvFilter, CoreError> {
    EnvFilter::try_new(level.to_string()).map_err(|e| LoggingError::FilterError(e.to_string()).into())
}

/// Builds a daily-rolling file layer and returns it with its worker guard.
fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !directory.is_dir() {
        ensure_dir_exists(directory)?;
    }

    let file_name = log_path.file_name().unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE_NAME));
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| LoggingError::InitializationFailure(format!("Failed to open log file in {:?}: {}", directory, e)))?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer = if format.eq_ignore_ascii_case("json") {
        fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    };
    Ok((layer, guard))
}

fn create_stdout_layer(format: &str, filter: EnvFilter) -> BoxedLayer {
    if format.eq_ignore_ascii_case("json") {
        fmt::layer().json().with_writer(stdout).with_ansi(false).with_filter(filter).boxed()
    } else {
        fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(filter)
            .boxed()
    }
}

fn store_worker_guard(guard: Option<WorkerGuard>) {
    match LOG_WORKER_GUARD.lock() {
        // Replacing the slot drops the previous guard, which flushes its writer.
        Ok(mut slot) => *slot = guard,
        Err(e) => eprintln!("[ERROR] Failed to lock log worker guard: {}. Log flushing may be affected.", e),
    }
}

/// Installs the global subscriber described by `config`.
///
/// With `is_reload` set, failing to replace an existing subscriber is reported on
/// stderr and treated as success; otherwise it is an error.
///
/// # Errors
///
/// [`LoggingError::InitializationFailure`] for an unknown level or when the global
/// subscriber is already set on first initialization. File layer setup failures are
/// returned as [`CoreError::Filesystem`].
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;

    let mut layers: Vec<BoxedLayer> = vec![create_stdout_layer(&config.format, level_filter(level)?)];

    let mut file_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        layers.push(file_layer.with_filter(level_filter(level)?).boxed());
        file_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();
    if result.is_ok() || is_reload {
        store_worker_guard(file_guard);
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            eprintln!("[INFO] Logging re-initialization attempted; previous subscriber may persist: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}
