// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte vocabulary of the companion link.
//!
//! The values are fixed by the vision co-processor's firmware; none of them may change without a
//! matching change on the other end.

// Session opening
pub const PEER_READY: u8 = b'D';
pub const READY_ACK: u8 = b'A';
pub const READY_NAK: u8 = b'H';

// Request codes
pub const REQ_VISION: u8 = b'C';
pub const REQ_TELEMETRY: u8 = b'R';

/// Sent by the peer to start a transfer, echoed back as "started".
pub const START: u8 = b'S';

// Negative acknowledgments for a missing start byte
pub const VISION_START_NAK: u8 = b'<';
pub const TELEMETRY_START_NAK: u8 = b')';

// Vision payloads
pub const VISION_VEHICLE: u8 = b'V';
pub const VISION_OBSTACLE: u8 = b'O';

// Payload acknowledgments
pub const VISION_ACK: u8 = b'F';
pub const VISION_REJECT: u8 = b'G';
pub const TELEMETRY_ACK: u8 = b'K';
pub const TELEMETRY_REJECT: u8 = b'L';

/// Valid telemetry payloads: color fixed to red.
pub const TELEMETRY_VALID: core::ops::RangeInclusive<u8> = 100..=119;

/// Which payload a handshake asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    /// Verdict of the main car's camera on the obstacle ahead.
    Vision,
    /// Companion car status, relayed by the co-processor.
    Telemetry,
}

impl RequestKind {
    pub fn code(self) -> u8 {
        match self {
            RequestKind::Vision => REQ_VISION,
            RequestKind::Telemetry => REQ_TELEMETRY,
        }
    }

    pub fn start_nak(self) -> u8 {
        match self {
            RequestKind::Vision => VISION_START_NAK,
            RequestKind::Telemetry => TELEMETRY_START_NAK,
        }
    }

    pub fn accepts(self, payload: u8) -> bool {
        match self {
            RequestKind::Vision => matches!(payload, VISION_VEHICLE | VISION_OBSTACLE),
            RequestKind::Telemetry => TELEMETRY_VALID.contains(&payload),
        }
    }

    pub fn ack(self) -> u8 {
        match self {
            RequestKind::Vision => VISION_ACK,
            RequestKind::Telemetry => TELEMETRY_ACK,
        }
    }

    pub fn reject(self) -> u8 {
        match self {
            RequestKind::Vision => VISION_REJECT,
            RequestKind::Telemetry => TELEMETRY_REJECT,
        }
    }
}

/// Camera classification of the obstacle ahead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VisionVerdict {
    Vehicle,
    /// Something that isn't a car; the main car has to stop for it.
    Obstacle,
}

impl VisionVerdict {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            VISION_VEHICLE => Some(VisionVerdict::Vehicle),
            VISION_OBSTACLE => Some(VisionVerdict::Obstacle),
            _ => None,
        }
    }
}
