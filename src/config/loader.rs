//! Configuration loader with file resolution.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Config file name
const CONFIG_FILE_NAME: &str = "sercat.toml";

/// Configuration loader with resolution logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `./sercat.toml` (current directory)
    /// 2. `sercat.toml` in the platform config directory
    ///    (`~/.config/sercat` on Linux, `~/Library/Application Support/sercat`
    ///    on macOS, `%APPDATA%\sercat\config` on Windows)
    /// 3. Built-in defaults (no file required)
    pub fn load() -> ConfigResult<Self> {
        match resolve_config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::with_defaults()),
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let config = load_from_file(&path)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        Self {
            config_path: None,
            config: Config::default(),
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.is_file() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.is_file())
}

/// Get the platform config file path, whether or not it exists.
pub fn get_default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sercat").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}
