// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit between the board layer in `hw/` and the
//! application logic. Both are written against `embedded-hal` traits only.
//!
//! ## Existing drivers
//!
//! - [`l298n`] – L298N-style dual H-bridge (two PWM enables, four direction inputs)
//! - [`hcsr04`] – HC-SR04 ultrasonic ranger with polled echo timing

pub mod hcsr04;
pub mod l298n;

pub use hcsr04::Hcsr04;
pub use l298n::{L298n, MotorBridge, PinPattern};
