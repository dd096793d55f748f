//! # Configuration Module
//!
//! Handles loading and validating the application configuration from TOML files.
//!
//! This is the process-level configuration (tick rate, where the user settings
//! live, logging). The user-editable sensitivity and mapping values are kept by
//! the [`settings`](crate::settings) store instead.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PadmouseError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tick scheduling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
}

/// User settings store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_file_logging")]
    pub file: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            status_interval_ms: default_status_interval_ms(),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            file: default_file_logging(),
        }
    }
}

// Default value functions
fn default_poll_interval_ms() -> u64 { 16 }
fn default_status_interval_ms() -> u64 { 500 }

fn default_settings_path() -> PathBuf { PathBuf::from("./padmouse-settings.json") }

fn default_log_level() -> String { "info".to_string() }
fn default_log_dir() -> PathBuf { PathBuf::from("./logs") }
fn default_file_logging() -> bool { true }

/// Log levels accepted by `[logging] level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padmouse::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns [`PadmouseError::InvalidConfig`] naming the first value out of range
    pub fn validate(&self) -> Result<()> {
        if self.engine.poll_interval_ms == 0 || self.engine.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 1 and 1000"));
        }

        // Status updates are throttled to at most two per second
        if self.engine.status_interval_ms < 500 || self.engine.status_interval_ms > 60000 {
            return Err(invalid("status_interval_ms must be between 500 and 60000"));
        }

        if self.settings.path.as_os_str().is_empty() {
            return Err(invalid("settings path cannot be empty"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(&format!(
                "log level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        if self.logging.file && self.logging.dir.as_os_str().is_empty() {
            return Err(invalid("log dir cannot be empty when file logging is enabled"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> PadmouseError {
    PadmouseError::InvalidConfig(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.poll_interval_ms, 16);
        assert_eq!(config.engine.status_interval_ms, 500);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.engine.poll_interval_ms, default_poll_interval_ms());
        assert_eq!(config.settings.path, default_settings_path());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file);
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[engine]
poll_interval_ms = 8

[settings]
path = "/tmp/pad.json"

[logging]
level = "debug"
file = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.engine.poll_interval_ms, 8);
        assert_eq!(config.engine.status_interval_ms, 500);
        assert_eq!(config.settings.path, PathBuf::from("/tmp/pad.json"));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.file);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/padmouse.toml");
        assert!(matches!(result, Err(PadmouseError::Io(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml("[engine\npoll_interval_ms = ");
        assert!(matches!(result, Err(PadmouseError::Config(_))));
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.engine.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = Config::default();
        config.engine.poll_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_status_interval_below_throttle_floor() {
        let mut config = Config::default();
        config.engine.status_interval_ms = 499;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_status_interval_too_high() {
        let mut config = Config::default();
        config.engine.status_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_settings_path() {
        let mut config = Config::default();
        config.settings.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in LOG_LEVELS {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Log level {} should be valid", level);
        }
    }

    #[test]
    fn test_empty_log_dir_when_file_logging() {
        let mut config = Config::default();
        config.logging.dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_without_file_logging() {
        let mut config = Config::default();
        config.logging.file = false;
        config.logging.dir = PathBuf::new();
        assert!(config.validate().is_ok());
    }
}
