//! Port session: configuration, format parsing, and the open device handle.
//!
//! The forwarder only sees the [`PortHandle`] trait, so tests can drive it with
//! a [`MockPort`] instead of real hardware.

pub mod error;
pub mod format;
pub mod mock;
pub mod serial;
pub mod traits;

pub use error::PortError;
pub use format::parse_format;
pub use mock::MockPort;
pub use serial::{available_ports, SerialPortHandle, POLL_INTERVAL};
pub use traits::*;
