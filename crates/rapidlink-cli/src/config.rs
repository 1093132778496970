//! Configuration system for rapidlink CLI.

use rapidlink_core::LinkFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest accepted read buffer (4 KiB)
const MIN_READ_BUFFER: usize = 4 * 1024;

/// Largest accepted read buffer (16 MiB)
const MAX_READ_BUFFER: usize = 16 * 1024 * 1024;

/// rapidlink configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Hashing configuration
    #[serde(default)]
    pub hashing: HashingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Formats produced when none are given on the command line
    #[serde(default = "default_targets")]
    pub default_targets: Vec<LinkFormat>,
    /// Prefix each link with its format label
    #[serde(default = "default_true")]
    pub show_labels: bool,
}

/// Hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Read buffer size in bytes
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Files at least this large get a progress bar
    #[serde(default = "default_progress_threshold")]
    pub progress_threshold: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values

fn default_targets() -> Vec<LinkFormat> {
    vec![LinkFormat::StandardLong]
}

fn default_true() -> bool {
    true
}

fn default_read_buffer_size() -> usize {
    64 * 1024
}

fn default_progress_threshold() -> u64 {
    64 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_targets: default_targets(),
            show_labels: true,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            progress_threshold: default_progress_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("rapidlink/config.toml")
    }

    /// Load config from default path, or create default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if reading or creating the config fails.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.output.default_targets.is_empty() {
            anyhow::bail!("output.default_targets must name at least one link format");
        }

        if !(MIN_READ_BUFFER..=MAX_READ_BUFFER).contains(&self.hashing.read_buffer_size) {
            anyhow::bail!("Read buffer size must be between 4KB and 16MB");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}
