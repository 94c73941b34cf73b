// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Indicator LED on any `embedded-hal` output pin.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED abstraction that remembers its active level and last commanded state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Create an LED wrapper and switch it off.
    pub fn new(pin: PIN, active: ActiveLevel) -> Result<Self> {
        let mut led = Self {
            pin,
            active,
            is_on: true,
        };
        led.set(false)?;
        Ok(led)
    }

    pub fn active_high(pin: PIN) -> Result<Self> {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Result<Self> {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the LED logically on or off. Does nothing if it is already in that state.
    pub fn set(&mut self, on: bool) -> Result<()> {
        if on == self.is_on {
            return Ok(());
        }
        let high = on == (self.active == ActiveLevel::High);
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| Error::Gpio)?;
        self.is_on = on;
        Ok(())
    }

    #[inline]
    pub fn on(&mut self) -> Result<()> {
        self.set(true)
    }

    #[inline]
    pub fn off(&mut self) -> Result<()> {
        self.set(false)
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}
