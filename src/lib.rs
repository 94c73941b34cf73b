// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # V2V Overtake Firmware
//!
//! This crate contains the firmware for a two-car vehicle-to-vehicle overtaking demo, written in
//! Rust, targeting an STM32F767 MCU. The main car drives differential DC motors, ranges with four
//! ultrasonic sensors, and negotiates a timed lane change with a companion car through a vision
//! co-processor on a serial link.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around GPIO, TIM2 PWM, USART, SysTick (feature `stm32`) |
//! | [`drivers`] | Device-level drivers (L298N dual H-bridge, HC-SR04 ultrasonic ranger) |
//! | [`motors`] | Motor direction/speed state machine |
//! | [`sensors`] | Four-channel distance sensing |
//! | [`protocol`] | Telemetry codec, companion-link handshake, remote control tokens |
//! | [`control`] | Overtake orchestrator, main-car loop, companion reporter |
//!
//! Everything outside [`hw`] is generic over `embedded-hal` traits and runs on the host under
//! `cargo test`.
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the main car:
//!
//! ```bash
//! cargo run --release --features stm32 --target thumbv7em-none-eabihf --bin main-car
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod logging;

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod hw;
pub mod motors;
pub mod protocol;
pub mod sensors;

#[cfg(test)]
pub(crate) mod mock;

pub use config::Config;
pub use error::{Error, Result};
