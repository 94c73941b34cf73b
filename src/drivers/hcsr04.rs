// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! HC-SR04 ultrasonic ranger.
//!
//! Time of flight is measured by counting fixed-length polling iterations while the echo line is
//! high. There is no input-capture timer behind this, so the result depends on the calibrated
//! iteration duration in [`SensorConfig::iteration_us`].

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::config::SensorConfig;
use crate::error::{Error, Result};

/// Speed of sound at room temperature.
pub const SOUND_CM_PER_US: f32 = 0.0343;

/// Result of a single ping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Echo {
    /// Polling iterations counted while the echo was high.
    pub polls: u32,
    /// One-way distance.
    pub cm: f32,
    /// The echo was still high after `max_echo_polls`; `cm` is the maximum range.
    pub saturated: bool,
}

/// Convert a poll count into a one-way distance.
#[inline]
pub fn polls_to_cm(polls: u32, iteration_us: f32) -> f32 {
    polls as f32 * iteration_us * SOUND_CM_PER_US / 2.0
}

pub struct Hcsr04<TRIG, ECHO> {
    trigger: TRIG,
    echo: ECHO,
}

impl<TRIG: OutputPin, ECHO: InputPin> Hcsr04<TRIG, ECHO> {
    pub fn new(trigger: TRIG, echo: ECHO) -> Self {
        Self { trigger, echo }
    }

    pub fn free(self) -> (TRIG, ECHO) {
        (self.trigger, self.echo)
    }

    fn echo_high(&mut self) -> Result<bool> {
        self.echo.is_high().map_err(|_| Error::Gpio)
    }

    /// Fire one ping and time the echo.
    ///
    /// Returns `Timeout` if the echo never rises within `max_rise_polls`.
    pub fn ping<D: DelayNs>(&mut self, delay: &mut D, cfg: &SensorConfig) -> Result<Echo> {
        self.trigger.set_low().map_err(|_| Error::Gpio)?;
        delay.delay_us(cfg.trigger_settle_us);
        self.trigger.set_high().map_err(|_| Error::Gpio)?;
        delay.delay_us(cfg.trigger_pulse_us);
        self.trigger.set_low().map_err(|_| Error::Gpio)?;

        // 8-cycle 40 kHz burst
        delay.delay_us(cfg.burst_wait_us);

        let mut waited = 0;
        while !self.echo_high()? {
            waited += 1;
            if waited >= cfg.max_rise_polls {
                return Err(Error::Timeout);
            }
            delay.delay_us(cfg.echo_poll_us);
        }

        let mut polls = 0;
        while self.echo_high()? {
            if polls >= cfg.max_echo_polls {
                return Ok(Echo {
                    polls,
                    cm: polls_to_cm(polls, cfg.iteration_us),
                    saturated: true,
                });
            }
            polls += 1;
            delay.delay_us(cfg.echo_poll_us);
        }

        Ok(Echo {
            polls,
            cm: polls_to_cm(polls, cfg.iteration_us),
            saturated: false,
        })
    }
}
