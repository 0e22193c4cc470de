//! Configuration schema definitions.
//!
//! Every section and field has a default, so an empty or partial file is valid.

use super::error::{ConfigError, ConfigResult};
use crate::port::{parse_format, DEFAULT_BAUD_RATE, DEFAULT_FORMAT};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Serial port defaults
    pub serial: SerialConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.default_baud == 0 {
            return Err(ConfigError::validation(
                "serial.default_baud",
                "baud rate must be positive",
            ));
        }
        parse_format(&self.serial.default_format)
            .map_err(|e| ConfigError::validation("serial.default_format", e.to_string()))?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::validation("logging.level", "must not be empty"));
        }
        Ok(())
    }
}

/// Serial port defaults, used when the positional argument is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    /// Baud rate when none is given on the command line
    pub default_baud: u32,
    /// Format string when none is given on the command line
    pub default_format: String,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            default_baud: DEFAULT_BAUD_RATE,
            default_format: DEFAULT_FORMAT.to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset ("warn", "sercat=debug", ...)
    pub level: String,
    /// Log format: "pretty" or "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line format with colors
    #[default]
    Pretty,
    /// Single-line format
    Compact,
}
