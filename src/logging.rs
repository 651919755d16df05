//! Logging configuration for the Athena console.
//!
//! Logs go to stderr, or to a file when `--log-file` is given (no ANSI colours
//! there). The level filter sits behind a reload handle so `set debug on` in
//! the shell can raise verbosity without restarting.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::error::{AthenaError, Result};

/// Filter used when `RUST_LOG` is unset and debug is off.
const DEFAULT_DIRECTIVE: &str = "warn";
const DEBUG_DIRECTIVE: &str = "debug";

/// Handle for changing the log level after initialization.
#[derive(Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Switches between debug output and the startup filter.
    pub fn set_debug(&self, debug: bool) -> Result<()> {
        self.filter
            .reload(build_filter(debug))
            .map_err(|e| AthenaError::internal(format!("Failed to change log level: {e}")))
    }
}

/// Initializes the global subscriber.
///
/// Writes to `log_file` when given (creating parent directories, truncating
/// the file), otherwise to stderr.
pub fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<LogHandle> {
    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let (filter, handle) = reload::Layer::new(build_filter(debug));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(ansi))
        .try_init()
        .map_err(|e| AthenaError::internal(format!("Failed to initialize logging: {e}")))?;

    Ok(LogHandle { filter: handle })
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AthenaError::config(format!(
                "Could not create log directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    File::create(path).map_err(|e| {
        AthenaError::config(format!("Could not create log file {}: {e}", path.display()))
    })
}

/// Debug wins over `RUST_LOG`; otherwise `RUST_LOG` wins over the default.
fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(DEBUG_DIRECTIVE);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
