// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Drive Abstractions
//!
//! This module contains the motor-level state machine that sits above the H-bridge driver in
//! `drivers`.
//!
//! ## Modules
//!
//! - [`state`] - Direction, speed level and turn bias types.
//! - [`actuator`] - `MotorActuator`, the single owner of motor state.

pub mod actuator;
pub mod state;

pub use actuator::MotorActuator;
pub use state::{MotorState, Side, SpeedLevel, TurnBias};
