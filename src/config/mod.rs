//! Configuration module for sercat.
//!
//! An optional TOML file supplies the defaults for the baud rate and format
//! positional arguments, and the log filter. Arguments given on the command
//! line always take precedence.
//!
//! # Example file
//!
//! ```toml
//! [serial]
//! default_baud = 9600
//! default_format = "7E1"
//!
//! [logging]
//! level = "sercat=debug"
//! format = "compact"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig};
