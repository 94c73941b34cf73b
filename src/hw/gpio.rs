// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO pins exposed through the `embedded-hal` 1.0 digital traits.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stm32f7xx_hal::gpio::{self, Floating, Input, Output, PushPull};

/// Push-pull output, generic over any GPIO pin.
pub struct OutPin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> OutPin<P, N> {
    /// Reconfigure `pin` as a push-pull output, driven low.
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_low();
        Self { pin }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for OutPin<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for OutPin<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.pin.set_high();
        Ok(())
    }
}

/// Floating input, generic over any GPIO pin.
pub struct InPin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Input<Floating>>,
}

impl<const P: char, const N: u8> InPin<P, N> {
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        Self {
            pin: pin.into_floating_input(),
        }
    }

    pub fn free(self) -> gpio::Pin<P, N, Input<Floating>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for InPin<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> InputPin for InPin<P, N> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.pin.is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pin.is_low())
    }
}
