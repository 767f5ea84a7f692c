//! Configuration management for daynote-sync
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DEFAULT_API_TOKEN_ENV, DEFAULT_BACKEND_TYPE, DEFAULT_FILENAME_FORMAT, DEFAULT_NOTE_TEMPLATE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TASK_SECTION, MAX_REQUEST_TIMEOUT_SECS,
};
use crate::backend::microsoft_todo::GRAPH_API;
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend types the factory knows how to build
pub const SUPPORTED_BACKENDS: [&str; 2] = ["microsoft_todo", "memory"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub note: NoteConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Daily note configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteConfig {
    /// Directory holding the daily notes
    pub directory: PathBuf,
    /// chrono format of the note filename, without the `.md` extension
    pub filename_format: String,
    /// Heading under which new task lines are appended
    pub task_section: String,
    /// Content of a newly created note; `{date}` is replaced with the note date
    pub template: String,
}

/// Remote task list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Backend type (e.g., "microsoft_todo", "memory")
    pub backend_type: String,
    /// Identifier of the task list to sync with
    pub list_id: String,
    /// Environment variable holding the access token
    pub api_token_env: String,
    /// API root URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Store the remote task id on each synced note line
    pub link_remote_ids: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Minimum level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
    /// Also write logs to a file in the data directory
    pub log_to_file: bool,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            directory: dirs::document_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("daily"),
            filename_format: DEFAULT_FILENAME_FORMAT.to_string(),
            task_section: DEFAULT_TASK_SECTION.to_string(),
            template: DEFAULT_NOTE_TEMPLATE.to_string(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend_type: DEFAULT_BACKEND_TYPE.to_string(),
            list_id: String::new(),
            api_token_env: DEFAULT_API_TOKEN_ENV.to_string(),
            base_url: GRAPH_API.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { link_remote_ids: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("daynote-sync.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("daynote-sync").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.validate_note()?;
        self.validate_remote()?;

        if log_level(&self.logging.level).is_none() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        Ok(())
    }

    fn validate_note(&self) -> Result<()> {
        if self.note.directory.as_os_str().is_empty() {
            anyhow::bail!("note.directory cannot be empty");
        }

        // A filename format must render to something that varies by day
        let sample = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default();
        let rendered = datetime::render_date(sample, &self.note.filename_format).unwrap_or_default();
        if rendered.is_empty() || rendered == self.note.filename_format {
            anyhow::bail!("Invalid note.filename_format '{}'", self.note.filename_format);
        }

        if !self.note.task_section.trim_start().starts_with('#') {
            anyhow::bail!(
                "note.task_section must be a markdown heading, got '{}'",
                self.note.task_section
            );
        }

        Ok(())
    }

    fn validate_remote(&self) -> Result<()> {
        let remote = &self.remote;
        if !SUPPORTED_BACKENDS.contains(&remote.backend_type.as_str()) {
            anyhow::bail!(
                "unsupported backend_type '{}'. Available backends: {}",
                remote.backend_type,
                SUPPORTED_BACKENDS.join(", ")
            );
        }

        if remote.request_timeout_secs == 0 || remote.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            anyhow::bail!(
                "request_timeout_secs must be between 1 and {}, got {}",
                MAX_REQUEST_TIMEOUT_SECS,
                remote.request_timeout_secs
            );
        }

        if remote.backend_type == "microsoft_todo" {
            if remote.api_token_env.is_empty() {
                anyhow::bail!("remote.api_token_env cannot be empty");
            }
            if !remote.base_url.starts_with("http://") && !remote.base_url.starts_with("https://") {
                anyhow::bail!("remote.base_url must start with http:// or https://");
            }
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# daynote-sync Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::NOTE_DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("daynote-sync"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}

/// Parse a configured level name
pub fn log_level(level: &str) -> Option<log::LevelFilter> {
    level.parse().ok()
}
