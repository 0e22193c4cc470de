//! sercat library
//!
//! Links a serial port to standard input and output: bytes from the port go
//! to stdout, bytes typed on stdin go to the port.
//!
//! # Modules
//!
//! - `port`: Port configuration, format parsing, and the open device handle
//! - `forward`: Duplex forwarder and its shutdown protocol
//! - `complete`: Shell-completion candidates for the positional arguments
//! - `config`: Optional TOML configuration for defaults and logging
//! - `error`: Unified error handling

pub mod complete;
pub mod config;
pub mod error;
pub mod forward;
pub mod port;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use error::{AppError, AppResult};
pub use forward::{Forwarder, LoopExit};
pub use port::{
    parse_format, DataBits, FrameFormat, MockPort, Parity, PortConfiguration, PortError,
    PortHandle, SerialPortHandle, StopBits,
};
