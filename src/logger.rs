//! Logging setup.
//!
//! Routes the `log` macros through `fern` to stderr, an optional log file, and an
//! in-memory [`LogBuffer`] the binary prints from when a sync fails.

use anyhow::{Context, Result};
use chrono::Local;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::{log_level, LoggingConfig};

/// Lines kept by the in-memory buffer
const LOG_BUFFER_CAPACITY: usize = 500;

/// Shared buffer of recent log lines
#[derive(Clone)]
pub struct LogBuffer {
    logs: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(LOG_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Add a log entry, dropping the oldest one when full
    pub fn log(&self, message: String) {
        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() == self.capacity {
                logs.pop_front();
            }
            logs.push_back(message);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Location of the log file
pub fn get_log_file_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("daynote-sync").join("daynote-sync.log"))
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

/// Build the dispatcher for `config` without installing it.
///
/// Records go to `buffer` whenever logging is enabled; stderr and the log file
/// are added on top according to the configuration.
pub fn build_dispatch(config: &LoggingConfig, buffer: LogBuffer) -> Result<fern::Dispatch> {
    let level = if config.enabled {
        log_level(&config.level).ok_or_else(|| anyhow::anyhow!("Invalid logging level '{}'", config.level))?
    } else {
        log::LevelFilter::Off
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {:<5} {}: {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // Keep HTTP client internals out of the sync log
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Warn)
        .chain(fern::Output::call(move |record| buffer.log(record.args().to_string())))
        .chain(std::io::stderr());

    if config.enabled && config.log_to_file {
        let path = get_log_file_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    Ok(dispatch)
}

/// Install the global logger. Call once at startup.
pub fn setup(config: &LoggingConfig) -> Result<LogBuffer> {
    let buffer = LogBuffer::new();
    build_dispatch(config, buffer.clone())?
        .apply()
        .context("Failed to install logger")?;
    Ok(buffer)
}
