// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Abstraction Layer
//!
//! [`Led`] is generic over `embedded-hal` and builds everywhere. The rest binds the STM32F767
//! peripherals to the traits the drivers expect and only exists with the `stm32` feature.
//!
//! ## Modules
//!
//! - [`led`] - Active-high/low indicator LED.
//! - `delay` - SysTick busy-wait delay.
//! - `gpio` - Push-pull outputs and floating inputs as `embedded-hal` 1.0 pins.
//! - `pins` - Board pin map.
//! - `pwm` - TIM2 two-channel PWM for the H-bridge enables.
//! - `usart` - Polled serial port as a [`ByteLink`](crate::protocol::ByteLink).

pub mod led;

#[cfg(feature = "stm32")]
pub mod delay;
#[cfg(feature = "stm32")]
pub mod gpio;
#[cfg(feature = "stm32")]
pub mod pins;
#[cfg(feature = "stm32")]
pub mod pwm;
#[cfg(feature = "stm32")]
pub mod usart;

pub use led::{ActiveLevel, Led};

#[cfg(feature = "stm32")]
pub use delay::SysTickDelay;
#[cfg(feature = "stm32")]
pub use gpio::{InPin, OutPin};
#[cfg(feature = "stm32")]
pub use pins::BoardPins;
#[cfg(feature = "stm32")]
pub use pwm::{PwmChannel, Tim2Pwm};
#[cfg(feature = "stm32")]
pub use usart::Usart;
