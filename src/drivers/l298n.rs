// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! L298N-style dual H-bridge.
//!
//! Channel A drives the left wheel pair (M1/M2), channel B the right pair (M3/M4). Each channel has
//! an enable input fed by PWM and two direction inputs.

use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};

use crate::error::{Error, Result};
use crate::motors::MotorState;

/// Duty values handed to [`MotorBridge::set_duty`] are fractions of this.
pub const DUTY_FULL: u16 = 10_000;

/// Levels of the four direction inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct PinPattern {
    pub a_forward: bool,
    pub a_backward: bool,
    pub b_forward: bool,
    pub b_backward: bool,
}

impl PinPattern {
    const fn new(a_forward: bool, a_backward: bool, b_forward: bool, b_backward: bool) -> Self {
        Self {
            a_forward,
            a_backward,
            b_forward,
            b_backward,
        }
    }

    pub const fn for_state(state: MotorState) -> Self {
        match state {
            MotorState::Stop => Self::new(false, false, false, false),
            MotorState::Forward | MotorState::ForwardLeft | MotorState::ForwardRight => {
                Self::new(true, false, true, false)
            }
            MotorState::Backward | MotorState::BackLeft | MotorState::BackRight => {
                Self::new(false, true, false, true)
            }
            MotorState::Right => Self::new(true, false, false, false),
            MotorState::Left => Self::new(false, false, true, false),
        }
    }
}

/// Hardware seam below [`crate::motors::MotorActuator`].
pub trait MotorBridge {
    /// Commit enable duty on both channels, in units of [`DUTY_FULL`].
    fn set_duty(&mut self, a: u16, b: u16) -> Result<()>;

    /// Drive the four direction inputs.
    fn set_pins(&mut self, pattern: PinPattern) -> Result<()>;
}

pub struct L298n<IN1, IN2, IN3, IN4, ENA, ENB> {
    in1: IN1,
    in2: IN2,
    in3: IN3,
    in4: IN4,
    ena: ENA,
    enb: ENB,
}

impl<IN1, IN2, IN3, IN4, ENA, ENB> L298n<IN1, IN2, IN3, IN4, ENA, ENB>
where
    IN1: OutputPin,
    IN2: OutputPin,
    IN3: OutputPin,
    IN4: OutputPin,
    ENA: SetDutyCycle,
    ENB: SetDutyCycle,
{
    pub fn new(in1: IN1, in2: IN2, in3: IN3, in4: IN4, ena: ENA, enb: ENB) -> Self {
        Self {
            in1,
            in2,
            in3,
            in4,
            ena,
            enb,
        }
    }

    /// Release the pins and PWM channels.
    pub fn free(self) -> (IN1, IN2, IN3, IN4, ENA, ENB) {
        (self.in1, self.in2, self.in3, self.in4, self.ena, self.enb)
    }
}

#[inline]
fn level<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    let res = if high { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| Error::Gpio)
}

impl<IN1, IN2, IN3, IN4, ENA, ENB> MotorBridge for L298n<IN1, IN2, IN3, IN4, ENA, ENB>
where
    IN1: OutputPin,
    IN2: OutputPin,
    IN3: OutputPin,
    IN4: OutputPin,
    ENA: SetDutyCycle,
    ENB: SetDutyCycle,
{
    fn set_duty(&mut self, a: u16, b: u16) -> Result<()> {
        self.ena
            .set_duty_cycle_fraction(a.min(DUTY_FULL), DUTY_FULL)
            .map_err(|_| Error::Pwm)?;
        self.enb
            .set_duty_cycle_fraction(b.min(DUTY_FULL), DUTY_FULL)
            .map_err(|_| Error::Pwm)
    }

    fn set_pins(&mut self, pattern: PinPattern) -> Result<()> {
        level(&mut self.in1, pattern.a_forward)?;
        level(&mut self.in2, pattern.a_backward)?;
        level(&mut self.in3, pattern.b_forward)?;
        level(&mut self.in4, pattern.b_backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{HwEvent, HwLog, MockPin, MockPwm};

    fn bridge(
        log: &HwLog,
    ) -> L298n<MockPin, MockPin, MockPin, MockPin, MockPwm, MockPwm> {
        L298n::new(
            MockPin::new("in1", log),
            MockPin::new("in2", log),
            MockPin::new("in3", log),
            MockPin::new("in4", log),
            MockPwm::new("ena", DUTY_FULL, log),
            MockPwm::new("enb", DUTY_FULL, log),
        )
    }

    #[test]
    fn pivot_patterns_drive_one_pair() {
        assert_eq!(
            PinPattern::for_state(MotorState::Right),
            PinPattern::new(true, false, false, false)
        );
        assert_eq!(
            PinPattern::for_state(MotorState::Left),
            PinPattern::new(false, false, true, false)
        );
        assert_eq!(
            PinPattern::for_state(MotorState::BackLeft),
            PinPattern::for_state(MotorState::Backward)
        );
    }

    #[test]
    fn writes_go_to_the_right_pins() {
        let log = HwLog::default();
        let mut b = bridge(&log);
        b.set_duty(4_000, 10_000).unwrap();
        b.set_pins(PinPattern::for_state(MotorState::Backward)).unwrap();

        assert_eq!(
            log.events(),
            vec![
                HwEvent::Duty("ena", 4_000),
                HwEvent::Duty("enb", 10_000),
                HwEvent::Pin("in1", false),
                HwEvent::Pin("in2", true),
                HwEvent::Pin("in3", false),
                HwEvent::Pin("in4", true),
            ]
        );
    }

    #[test]
    fn duty_is_scaled_to_channel_period() {
        let log = HwLog::default();
        let mut b = L298n::new(
            MockPin::new("in1", &log),
            MockPin::new("in2", &log),
            MockPin::new("in3", &log),
            MockPin::new("in4", &log),
            MockPwm::new("ena", 1_000, &log),
            MockPwm::new("enb", 1_000, &log),
        );
        b.set_duty(5_000, 20_000).unwrap();
        assert_eq!(
            log.events(),
            vec![HwEvent::Duty("ena", 500), HwEvent::Duty("enb", 1_000)]
        );
    }
}
