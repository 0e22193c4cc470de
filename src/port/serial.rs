//! Serial device handle on top of the `serialport` crate.
//!
//! The device is split with `try_clone` into a reader half and a writer half so
//! that the two forwarding loops never contend on one lock. Reads poll with a
//! short timeout; that is what lets `close` from another thread end an
//! in-flight read, since the underlying handle cannot be freed while borrowed.

use super::error::PortError;
use super::traits::{PortConfiguration, PortHandle};
use crate::error::{AppError, AppResult};
use parking_lot::Mutex;
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Upper bound on how long an in-flight read can outlive `close`.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Device = Box<dyn serialport::SerialPort>;

/// An open serial device.
pub struct SerialPortHandle {
    name: String,
    config: PortConfiguration,
    reader: Mutex<Option<Device>>,
    writer: Mutex<Option<Device>>,
    closed: AtomicBool,
}

impl SerialPortHandle {
    /// Open a serial port with the given configuration.
    ///
    /// # Arguments
    /// * `port_name` - The system path to the serial port (e.g., "/dev/ttyUSB0" or "COM3")
    /// * `config` - Configuration parameters for the port
    ///
    /// # Example
    /// ```no_run
    /// use sercat::port::{PortConfiguration, SerialPortHandle};
    ///
    /// let config = PortConfiguration::from_args(115200, "8N1")?;
    /// let port = SerialPortHandle::open("/dev/ttyUSB0", &config)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: &PortConfiguration) -> AppResult<Self> {
        Self::open_device(port_name, config).map_err(|e| AppError::port_open(port_name, e))
    }

    fn open_device(port_name: &str, config: &PortConfiguration) -> Result<Self, PortError> {
        let parity: serialport::Parity = config.parity.try_into()?;
        let stop_bits: serialport::StopBits = config.stop_bits.try_into()?;

        let reader = serialport::new(port_name, config.baud_rate)
            .data_bits(config.data_bits.into())
            .flow_control(serialport::FlowControl::None)
            .parity(parity)
            .stop_bits(stop_bits)
            .timeout(POLL_INTERVAL)
            .open()
            .map_err(|e| PortError::from_open(port_name, e))?;
        let writer = reader.try_clone().map_err(PortError::Serial)?;

        tracing::debug!(port = port_name, config = %config, "serial port opened");

        Ok(Self {
            name: port_name.to_string(),
            config: *config,
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(Some(writer)),
            closed: AtomicBool::new(false),
        })
    }

    /// The configuration the device was opened with.
    pub fn config(&self) -> &PortConfiguration {
        &self.config
    }
}

impl PortHandle for SerialPortHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut reader = self.reader.lock();
        loop {
            if self.is_closed() {
                reader.take();
                return Err(PortError::Closed);
            }
            let device = reader.as_mut().ok_or(PortError::Closed)?;
            match device.read(buffer) {
                Ok(n) => return Ok(n),
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    continue
                }
                Err(e) => return Err(PortError::Io(e)),
            }
        }
    }

    fn write_bytes(&self, data: &[u8]) -> Result<usize, PortError> {
        let mut writer = self.writer.lock();
        loop {
            let device = writer.as_mut().ok_or(PortError::Closed)?;
            match device.write(data) {
                Ok(n) => return Ok(n),
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    if self.is_closed() {
                        return Err(PortError::Closed);
                    }
                }
                Err(e) => return Err(PortError::Io(e)),
            }
        }
    }

    fn close(&self) -> Result<(), PortError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!(port = %self.name, "closing serial port");

        // A blocked write holds this lock for at most one write timeout.
        if let Some(mut writer) = self.writer.lock().take() {
            let _ = writer.flush();
        }
        // If a read is in flight it drops the reader itself on its next poll.
        if let Some(mut reader) = self.reader.try_lock() {
            reader.take();
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for SerialPortHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortHandle")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// List the device names of the serial ports present on this system.
pub fn available_ports() -> Result<Vec<String>, PortError> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
