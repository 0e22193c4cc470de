//! Port-specific error types.
//!
//! Kept separate from the application-level [`AppError`](crate::AppError) so
//! that transport failures can be wrapped with the port name at open time.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// The caller lacks permission to open the device.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The driver rejected the requested configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration is valid but this driver cannot express it.
    #[error("Unsupported by the serial driver: {0}")]
    Unsupported(String),

    /// The handle has been closed; no further I/O is possible.
    #[error("Port is closed")]
    Closed,

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an Unsupported error from a message.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Whether this error reports a deliberately closed handle.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Classify a `serialport` open error, keeping the port name when the
    /// cause is about the device itself.
    pub(crate) fn from_open(port_name: &str, err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => Self::not_found(port_name),
            serialport::ErrorKind::InvalidInput => Self::config(err.to_string()),
            serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => Self::not_found(port_name),
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                Self::PermissionDenied(port_name.to_string())
            }
            _ => Self::Serial(err),
        }
    }
}
