// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Firmware-wide error type.
//!
//! Every error here is local and recoverable: it unwinds to the top of the control loop and the
//! next pass starts over.

use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Unrecognized direction or speed token. No hardware was touched.
    InvalidCommand,
    /// Speed level or telemetry byte outside its declared domain.
    OutOfRange,
    /// Peer did not open the handshake with its ready byte.
    PeerNotReady,
    /// Peer answered the request with something other than the start byte.
    UnexpectedAck,
    /// Payload failed validation and was discarded.
    InvalidPayload,
    /// A bounded wait (echo, serial receive, gap watch) ran out.
    Timeout,
    /// GPIO write or read failed.
    Gpio,
    /// PWM duty write failed.
    Pwm,
    /// Serial link reported a framing/overrun/noise error.
    Link,
}

impl Error {
    /// True for the three handshake protocol violations.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Error::PeerNotReady | Error::UnexpectedAck | Error::InvalidPayload
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidCommand => "invalid command token",
            Error::OutOfRange => "value out of range",
            Error::PeerNotReady => "peer not ready",
            Error::UnexpectedAck => "unexpected acknowledgment",
            Error::InvalidPayload => "invalid payload",
            Error::Timeout => "timed out",
            Error::Gpio => "gpio failure",
            Error::Pwm => "pwm failure",
            Error::Link => "serial link failure",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_are_classified() {
        assert!(Error::PeerNotReady.is_protocol());
        assert!(Error::UnexpectedAck.is_protocol());
        assert!(Error::InvalidPayload.is_protocol());
        assert!(!Error::Timeout.is_protocol());
        assert!(!Error::OutOfRange.is_protocol());
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(format!("{}", Error::PeerNotReady), "peer not ready");
        assert_eq!(format!("{}", Error::Timeout), "timed out");
    }
}
