use crate::config::ConfigError;
use crate::port::PortError;
use thiserror::Error;

/// A specialized `Result` type for sercat operations.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type.
///
/// Every variant is fatal to the invocation and is raised before forwarding
/// starts. Faults during forwarding are logged by the forwarder instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// A `<data bits><parity><stop bits>` string failed validation.
    #[error("invalid {field} '{value}'")]
    InvalidFormat { field: &'static str, value: String },

    /// The device could not be opened with the requested configuration.
    #[error("failed to open port '{port}': {source}")]
    PortOpen {
        port: String,
        #[source]
        source: PortError,
    },

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Runtime setup failed (thread spawn, runtime build).
    #[error("An I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub(crate) fn invalid_format(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn port_open(port: impl Into<String>, source: PortError) -> Self {
        Self::PortOpen {
            port: port.into(),
            source,
        }
    }

    /// The offending field for format errors, `None` for everything else.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidFormat { field, .. } => Some(field),
            _ => None,
        }
    }
}
