//! Diagnostic logging setup.
//!
//! The chat view owns the terminal, so tracing output goes to a file when one
//! is configured. Filtering follows `PONDER_LOG` (e.g. `ponder=debug`).

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "PONDER_LOG";

/// Where diagnostics should be written for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber; tracing macros are no-ops.
    Disabled,
    /// Append to a file.
    File(String),
    /// Write to stderr (non-interactive commands only).
    Stderr,
}

impl LogTarget {
    /// Pick a target for the interactive UI, which must never write to the
    /// terminal it draws on.
    pub fn for_tui(log_file: Option<String>) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path),
            None => LogTarget::Disabled,
        }
    }

    pub fn for_cli(log_file: Option<String>) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path),
            None => LogTarget::Stderr,
        }
    }
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber. Calling it again after a subscriber is set
/// is harmless.
pub fn init_logging(target: &LogTarget) -> Result<(), Box<dyn Error>> {
    match target {
        LogTarget::Disabled => Ok(()),
        LogTarget::File(path) => {
            test_file_access(path)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("info"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
            Ok(())
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("warn"))
                .with_writer(std::io::stderr)
                .try_init();
            Ok(())
        }
    }
}

fn test_file_access(path: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        if !parent.exists() {
            return Err(format!("Log directory does not exist: {}", parent.display()).into());
        }
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}
