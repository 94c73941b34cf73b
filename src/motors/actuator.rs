// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Direction/speed state machine on top of a [`MotorBridge`].
//!
//! The actuator is the only owner of the motor state. A direction command equal to the current
//! state is re-affirmed without touching the hardware; any other transition commits both PWM
//! duties before the direction pins, then records the new state.

use crate::drivers::l298n::{MotorBridge, PinPattern};
use crate::error::Result;

use super::state::{MotorState, Side, SpeedLevel};

pub struct MotorActuator<B: MotorBridge> {
    bridge: B,
    state: MotorState,
    speed: SpeedLevel,
}

impl<B: MotorBridge> MotorActuator<B> {
    pub fn new(bridge: B, speed: SpeedLevel) -> Self {
        Self {
            bridge,
            state: MotorState::Stop,
            speed,
        }
    }

    /// Drive all direction pins low and record `Stop`.
    pub fn init(&mut self) -> Result<()> {
        self.bridge
            .set_pins(PinPattern::for_state(MotorState::Stop))?;
        self.state = MotorState::Stop;
        Ok(())
    }

    /// Load the current speed's duty on both channels.
    pub fn start(&mut self) -> Result<()> {
        let duty = self.speed.duty();
        self.bridge.set_duty(duty, duty)
    }

    /// Move to `dir`. Returns `false` if `dir` was already current and nothing was written.
    pub fn set_direction(&mut self, dir: MotorState) -> Result<bool> {
        if dir == self.state {
            return Ok(false);
        }

        let (a, b) = self.duties_for(dir);
        self.bridge.set_duty(a, b)?;
        self.bridge.set_pins(PinPattern::for_state(dir))?;
        self.state = dir;

        log_debug!("motors: {:?} (duty {} / {})", dir, a, b);
        Ok(true)
    }

    #[inline]
    pub fn stop(&mut self) -> Result<bool> {
        self.set_direction(MotorState::Stop)
    }

    /// Store `level` and immediately apply its straight duty to both channels.
    ///
    /// A diagonal turn in progress loses its bias until the next direction change.
    pub fn set_speed(&mut self, level: SpeedLevel) -> Result<()> {
        let duty = level.duty();
        self.bridge.set_duty(duty, duty)?;
        self.speed = level;
        Ok(())
    }

    /// Store `level` without touching the PWM. It takes effect on the next direction change.
    #[inline]
    pub fn preset_speed(&mut self, level: SpeedLevel) {
        self.speed = level;
    }

    /// Raw numeric variant of [`Self::set_speed`]; levels above 10 are `OutOfRange`.
    pub fn set_speed_level(&mut self, level: u8) -> Result<()> {
        self.set_speed(SpeedLevel::new(level)?)
    }

    pub fn apply_direction_token(&mut self, token: u8) -> Result<bool> {
        self.set_direction(MotorState::from_token(token)?)
    }

    pub fn apply_speed_token(&mut self, token: u8) -> Result<()> {
        self.set_speed(SpeedLevel::from_token(token)?)
    }

    #[inline]
    pub fn state(&self) -> MotorState {
        self.state
    }

    #[inline]
    pub fn speed(&self) -> SpeedLevel {
        self.speed
    }

    pub fn free(self) -> B {
        self.bridge
    }

    fn duties_for(&self, dir: MotorState) -> (u16, u16) {
        if dir == MotorState::Stop {
            return (0, 0);
        }
        let d = self.speed.duty();
        match dir.bias() {
            Some(bias) if bias.inner == Side::Left => (bias.apply(d), d),
            Some(bias) => (d, bias.apply(d)),
            None => (d, d),
        }
    }
}
