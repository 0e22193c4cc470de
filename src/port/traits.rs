//! Core types for the serial port session.
//!
//! Defines the port configuration and the `PortHandle` trait that lets both the
//! real serial device and the in-memory mock be driven by the forwarder.

use super::error::PortError;
use std::fmt;

/// Baud rate used when none is given on the command line.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Framing used when none is given on the command line.
pub const DEFAULT_FORMAT: &str = "8N1";

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Map a numeric bit count onto the enumerated set.
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            5 => Some(Self::Five),
            6 => Some(Self::Six),
            7 => Some(Self::Seven),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    None,
    Odd,
    Even,
    Mark,
    Space,
}

impl Parity {
    /// Parse the single-letter code used in format strings (`N`, `O`, `E`, `M`, `S`).
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "N" => Some(Self::None),
            "O" => Some(Self::Odd),
            "E" => Some(Self::Even),
            "M" => Some(Self::Mark),
            "S" => Some(Self::Space),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::None => 'N',
            Self::Odd => 'O',
            Self::Even => 'E',
            Self::Mark => 'M',
            Self::Space => 'S',
        }
    }
}

/// The `serialport` driver only knows none/odd/even parity.
impl TryFrom<Parity> for serialport::Parity {
    type Error = PortError;

    fn try_from(parity: Parity) -> Result<Self, Self::Error> {
        match parity {
            Parity::None => Ok(serialport::Parity::None),
            Parity::Odd => Ok(serialport::Parity::Odd),
            Parity::Even => Ok(serialport::Parity::Even),
            Parity::Mark => Err(PortError::unsupported("mark parity")),
            Parity::Space => Err(PortError::unsupported("space parity")),
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopBits {
    One,
    OnePointFive,
    Two,
}

impl StopBits {
    /// Parse the stop-bit token used in format strings (`1`, `1.5`, `2`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::One),
            "1.5" => Some(Self::OnePointFive),
            "2" => Some(Self::Two),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::OnePointFive => "1.5",
            Self::Two => "2",
        }
    }
}

impl TryFrom<StopBits> for serialport::StopBits {
    type Error = PortError;

    fn try_from(bits: StopBits) -> Result<Self, Self::Error> {
        match bits {
            StopBits::One => Ok(serialport::StopBits::One),
            StopBits::Two => Ok(serialport::StopBits::Two),
            StopBits::OnePointFive => Err(PortError::unsupported("1.5 stop bits")),
        }
    }
}

/// Character framing: data bits, parity and stop bits, as written in `8N1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.data_bits.count(),
            self.parity.letter(),
            self.stop_bits.token()
        )
    }
}

/// Configuration parameters for a serial port.
///
/// Built once from user input and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Number of data bits (5, 6, 7, or 8).
    pub data_bits: DataBits,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,
}

impl PortConfiguration {
    /// Combine a baud rate with a parsed frame format.
    pub fn new(baud_rate: u32, format: FrameFormat) -> Self {
        Self {
            baud_rate,
            data_bits: format.data_bits,
            parity: format.parity,
            stop_bits: format.stop_bits,
        }
    }

    pub fn format(&self) -> FrameFormat {
        FrameFormat {
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
        }
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_BAUD_RATE, FrameFormat::default())
    }
}

impl fmt::Display for PortConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.baud_rate, self.format())
    }
}

/// An open port shared between the two forwarding loops.
///
/// All methods take `&self`: the output loop only reads, the input loop only
/// writes, and the orchestrator only closes. Implementations must allow
/// `close` to be called while a `read_bytes` is blocked on another thread, and
/// must make that read return (with [`PortError::Closed`] or `Ok(0)`) within a
/// bounded time.
pub trait PortHandle: Send + Sync + fmt::Debug {
    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Read bytes from the port into the provided buffer, blocking until at
    /// least one byte is available.
    ///
    /// `Ok(0)` means the device reached end of stream.
    fn read_bytes(&self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Write bytes to the port.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&self, data: &[u8]) -> Result<usize, PortError>;

    /// Release the device. Calling it again is a no-op.
    fn close(&self) -> Result<(), PortError>;

    /// Whether `close` has been called.
    fn is_closed(&self) -> bool;

    /// Write the whole buffer, retrying short writes.
    fn write_all_bytes(&self, mut data: &[u8]) -> Result<(), PortError> {
        while !data.is_empty() {
            match self.write_bytes(data)? {
                0 => {
                    return Err(PortError::Io(std::io::Error::new(
                        std::io::ErrorKind::WriteZero,
                        "port accepted no bytes",
                    )))
                }
                n => data = &data[n..],
            }
        }
        Ok(())
    }
}
