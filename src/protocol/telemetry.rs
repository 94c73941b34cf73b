// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Companion status packed into one decimal-coded byte: `color*100 + object*10 + speed`.

use crate::error::{Error, Result};

use super::messages::TELEMETRY_VALID;

/// The only color the receiver accepts.
pub const RED: u8 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    color: u8,
    object_detected: bool,
    speed: u8,
}

impl TelemetryRecord {
    /// Fields must be single decimal digits and the packed value must fit in a byte.
    pub fn new(color: u8, object_detected: bool, speed: u8) -> Result<Self> {
        if color > 9 || speed > 9 {
            return Err(Error::OutOfRange);
        }
        let packed = color as u16 * 100 + object_detected as u16 * 10 + speed as u16;
        if packed > u8::MAX as u16 {
            return Err(Error::OutOfRange);
        }
        Ok(Self {
            color,
            object_detected,
            speed,
        })
    }

    #[inline]
    pub fn color(&self) -> u8 {
        self.color
    }

    #[inline]
    pub fn object_detected(&self) -> bool {
        self.object_detected
    }

    #[inline]
    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn encode(&self) -> u8 {
        self.color * 100 + (self.object_detected as u8) * 10 + self.speed
    }

    /// Unpack a received byte. Only `100..=119` is legal on the wire.
    pub fn decode(byte: u8) -> Result<Self> {
        if !TELEMETRY_VALID.contains(&byte) {
            return Err(Error::OutOfRange);
        }
        let mut rest = byte;
        let speed = rest % 10;
        rest /= 10;
        let object_detected = rest % 10 == 1;
        rest /= 10;

        Ok(Self {
            color: rest,
            object_detected,
            speed,
        })
    }
}
