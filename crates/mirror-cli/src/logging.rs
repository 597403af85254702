//! Logging setup: a console layer plus an append-only log file

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Install the global subscriber.
///
/// Everything at `info` and above (`debug` when `verbose`) is appended to
/// `log_file` without ANSI colors. `RUST_LOG` overrides the file filter. The
/// console shows events at `console_level` and above on stderr, keeping
/// stdout free for reports.
pub fn init(log_file: &Path, console_level: LevelFilter, verbose: bool) -> Result<()> {
    let file = open_log_file(log_file)?;

    let default_level = if verbose { "debug" } else { "info" };
    let file_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(console_level);

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

/// Open `path` for appending, creating it and its parent directory.
fn open_log_file(path: &Path) -> Result<fs::File> {
    let log_error = |source| CliError::LogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(log_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_error)
}
