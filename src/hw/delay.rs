// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick busy-wait delay.

use cortex_m::{delay::Delay, peripheral::SYST};
use embedded_hal::delay::DelayNs;

pub struct SysTickDelay {
    inner: Delay,
}

impl SysTickDelay {
    pub fn new(syst: SYST, ahb_hz: u32) -> Self {
        Self {
            inner: Delay::new(syst, ahb_hz),
        }
    }

    pub fn free(self) -> SYST {
        self.inner.free()
    }
}

impl DelayNs for SysTickDelay {
    // SysTick resolution is well above a nanosecond; round up to whole microseconds.
    fn delay_ns(&mut self, ns: u32) {
        self.inner.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.inner.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
    }
}
