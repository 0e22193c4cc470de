//! Parsing of `<data bits><parity><stop bits>` format strings such as `8N1`.

use super::traits::{DataBits, FrameFormat, Parity, PortConfiguration, StopBits};
use crate::error::{AppError, AppResult};
use std::str::FromStr;

/// Parse a format string into its framing fields.
///
/// Checks run in a fixed order: overall length, then data bits, parity and
/// stop bits. The first failing check names the field in the error, so `61`
/// reports `format` and `9N1` reports `data bits`.
pub fn parse_format(format: &str) -> AppResult<FrameFormat> {
    if format.len() < 3 {
        return Err(AppError::invalid_format("format", format));
    }

    let data_bits = format
        .get(0..1)
        .and_then(|digit| digit.parse::<u8>().ok())
        .and_then(DataBits::from_count)
        .ok_or_else(|| AppError::invalid_format("data bits", lossy(format, 0..1)))?;

    let parity = format
        .get(1..2)
        .and_then(Parity::from_letter)
        .ok_or_else(|| AppError::invalid_format("parity", lossy(format, 1..2)))?;

    let stop_bits = format
        .get(2..)
        .and_then(StopBits::from_token)
        .ok_or_else(|| AppError::invalid_format("stop bits", lossy(format, 2..format.len())))?;

    Ok(FrameFormat {
        data_bits,
        parity,
        stop_bits,
    })
}

impl FromStr for FrameFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_format(s)
    }
}

impl PortConfiguration {
    /// Validate a format string and combine it with a baud rate.
    pub fn from_args(baud_rate: u32, format: &str) -> AppResult<Self> {
        Ok(Self::new(baud_rate, parse_format(format)?))
    }
}

// Byte ranges may split a multi-byte character; report what is there anyway.
fn lossy(format: &str, range: std::ops::Range<usize>) -> String {
    String::from_utf8_lossy(&format.as_bytes()[range]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_8n1() {
        let format = parse_format("8N1").unwrap();
        assert_eq!(
            format,
            FrameFormat {
                data_bits: DataBits::Eight,
                parity: Parity::None,
                stop_bits: StopBits::One,
            }
        );
    }

    #[test]
    fn test_parse_one_and_a_half_stop_bits() {
        let format = parse_format("7E1.5").unwrap();
        assert_eq!(format.data_bits, DataBits::Seven);
        assert_eq!(format.parity, Parity::Even);
        assert_eq!(format.stop_bits, StopBits::OnePointFive);
    }

    #[test]
    fn test_short_format_fails_on_length() {
        for input in ["", "8", "8N", "61"] {
            let err = parse_format(input).unwrap_err();
            assert_eq!(err.field(), Some("format"), "input {input:?}");
        }
    }

    #[test]
    fn test_bad_data_bits() {
        assert_eq!(parse_format("XN1").unwrap_err().field(), Some("data bits"));
        assert_eq!(parse_format("9N1").unwrap_err().field(), Some("data bits"));
        assert_eq!(parse_format("4N1").unwrap_err().field(), Some("data bits"));
    }

    #[test]
    fn test_bad_parity() {
        let err = parse_format("6X2").unwrap_err();
        assert_eq!(err.field(), Some("parity"));
        assert_eq!(err.to_string(), "invalid parity 'X'");
        assert_eq!(parse_format("8n1").unwrap_err().field(), Some("parity"));
    }

    #[test]
    fn test_bad_stop_bits() {
        for input in ["8N3", "8N1.", "8N1.0", "8N15", "8N2 "] {
            let err = parse_format(input).unwrap_err();
            assert_eq!(err.field(), Some("stop bits"), "input {input:?}");
        }
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(parse_format("é81").unwrap_err().field(), Some("data bits"));
        assert_eq!(parse_format("8é1").unwrap_err().field(), Some("parity"));
        assert_eq!(parse_format("8Né").unwrap_err().field(), Some("stop bits"));
    }

    #[test]
    fn test_from_args() {
        let config = PortConfiguration::from_args(9600, "5O2").unwrap();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.to_string(), "9600 5O2");
        assert!(PortConfiguration::from_args(9600, "5Q2").is_err());
    }

    #[test]
    fn test_from_str() {
        let format: FrameFormat = "8S2".parse().unwrap();
        assert_eq!(format.parity, Parity::Space);
    }
}
