// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM2 edge-aligned PWM on channels 1 and 2.
//!
//! The timer runs with a fixed prescaler and auto-reload so that a compare value of `period` is
//! 100% duty. CH1 feeds the left H-bridge enable (ENA, PA0), CH2 the right one (ENB, PA1).

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use stm32f7xx_hal::pac;

use crate::config::DriveConfig;

/// Output compare mode 1: active while CNT < CCRx.
const OCM_PWM1: u8 = 0b110;

pub struct Tim2Pwm {
    tim: pac::TIM2,
    period: u16,
}

impl Tim2Pwm {
    /// Configure TIM2 and start it with both channels at 0% duty.
    ///
    /// `rcc` is only used to enable the timer clock.
    pub fn new(tim2: pac::TIM2, rcc: &pac::rcc::RegisterBlock, cfg: &DriveConfig) -> Self {
        let tim = tim2;
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc.write(|w| w.psc().bits(cfg.pwm_prescaler));
        tim.arr.write(|w| w.bits(cfg.pwm_period as u32));

        tim.ccr1.write(|w| w.bits(0));
        tim.ccr2.write(|w| w.bits(0));

        // PWM mode 1 with preload on CH1/CH2
        tim.ccmr1_output().modify(|_, w| unsafe {
            w.oc1m()
                .bits(OCM_PWM1)
                .oc1pe()
                .set_bit()
                .oc2m()
                .bits(OCM_PWM1)
                .oc2pe()
                .set_bit()
        });

        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        // Latch PSC/ARR, then run with auto-reload preload.
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());

        Self {
            tim,
            period: cfg.pwm_period,
        }
    }

    /// Hand out the two compare channels. The timer stays configured for as long as they exist.
    pub fn split(self) -> (PwmChannel<1>, PwmChannel<2>) {
        let period = self.period;
        (PwmChannel { period }, PwmChannel { period })
    }

    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}

/// One TIM2 compare channel (`C` is 1 or 2).
pub struct PwmChannel<const C: u8> {
    period: u16,
}

impl<const C: u8> ErrorType for PwmChannel<C> {
    type Error = Infallible;
}

impl<const C: u8> SetDutyCycle for PwmChannel<C> {
    #[inline]
    fn max_duty_cycle(&self) -> u16 {
        self.period
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        let duty = duty.min(self.period) as u32;
        // SAFETY: each channel only ever writes its own compare register.
        let tim = unsafe { &*pac::TIM2::ptr() };
        match C {
            1 => tim.ccr1.write(|w| w.bits(duty)),
            _ => tim.ccr2.write(|w| w.bits(duty)),
        }
        Ok(())
    }
}
