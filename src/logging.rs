//! Logging setup and failure recording
//!
//! Every failed query is handed to a [`FailureRecorder`]. The default
//! [`TracingRecorder`] turns it into an ERROR event; [`init`] routes those
//! events to a daily rolling JSON file next to the usual stderr output.

use std::error::Error;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{error, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::ERROR_LOG_PREFIX;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path:?}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create error log in {path:?}: {source}")]
    Appender {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Sink for errors raised while answering a query
#[cfg_attr(test, automock)]
pub trait FailureRecorder {
    /// Record that `operation` failed with `error`; must not fail itself
    fn record_failure(&self, operation: &str, error: &(dyn Error + 'static));
}

/// Recorder that emits an ERROR event carrying the full error chain
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl FailureRecorder for TracingRecorder {
    fn record_failure(&self, operation: &str, error: &(dyn Error + 'static)) {
        error!(operation, error = %error_chain(error), "Operation failed");
    }
}

/// `outer: inner: root` rendering of an error and its sources
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // thiserror `{0}` messages often repeat their source verbatim
        if !chain.ends_with(&cause_text) {
            let _ = write!(chain, ": {}", cause_text);
        }
        source = cause.source();
    }
    chain
}

/// Install the global subscriber.
///
/// Stderr honours `RUST_LOG`, falling back to `warn` (or `info` when
/// `verbose`). ERROR events are also written as JSON lines to
/// `<log_dir>/eoldate-error-log.<YYYY-MM-DD>.json`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the program.
pub fn init(log_dir: &Path, verbose: bool) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::LogDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(ERROR_LOG_PREFIX)
        .filename_suffix("json")
        .build(log_dir)
        .map_err(|source| LoggingError::Appender {
            path: log_dir.to_path_buf(),
            source,
        })?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter(verbose));

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// [`init`], falling back to stderr-only logging when the error log cannot
/// be set up. Returns the file writer guard when the error log is active.
pub fn init_or_stderr(log_dir: &Path, verbose: bool) -> Option<WorkerGuard> {
    match init(log_dir, verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            // Fails only when a subscriber is already installed
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_filter(stderr_filter(verbose)),
                )
                .try_init();
            warn!(error = %error_chain(&e), "Error log file disabled");
            None
        }
    }
}

/// `RUST_LOG` if set, else `warn` (`info` when verbose)
fn stderr_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "info" } else { "warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
