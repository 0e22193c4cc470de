//! Shell-completion candidates for the positional arguments.

use crate::port::{available_ports, DataBits, FrameFormat, Parity, StopBits};

/// Baud rates offered for the second positional argument.
pub const COMMON_BAUD_RATES: [u32; 14] = [
    1200, 1800, 2400, 4800, 7200, 9600, 14400, 19200, 28800, 38400, 57600, 76800, 115200, 230400,
];

/// Candidate values for the 1-based positional argument `position`.
///
/// Unknown positions yield nothing.
pub fn candidates(position: usize) -> Vec<String> {
    match position {
        1 => port_candidates(),
        2 => COMMON_BAUD_RATES.iter().map(u32::to_string).collect(),
        3 => all_formats().iter().map(ToString::to_string).collect(),
        _ => Vec::new(),
    }
}

fn port_candidates() -> Vec<String> {
    available_ports().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "port enumeration failed");
        Vec::new()
    })
}

/// Every valid framing, data bits outermost and stop bits innermost.
pub fn all_formats() -> Vec<FrameFormat> {
    let data_bits = [DataBits::Five, DataBits::Six, DataBits::Seven, DataBits::Eight];
    let parities = [Parity::None, Parity::Odd, Parity::Even, Parity::Mark, Parity::Space];
    let stop_bits = [StopBits::One, StopBits::OnePointFive, StopBits::Two];

    data_bits
        .into_iter()
        .flat_map(move |d| {
            parities.into_iter().flat_map(move |p| {
                stop_bits.into_iter().map(move |s| FrameFormat {
                    data_bits: d,
                    parity: p,
                    stop_bits: s,
                })
            })
        })
        .collect()
}
