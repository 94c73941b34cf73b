// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control
//!
//! Decision logic on top of the motor, sensor and link layers.
//!
//! ## Modules
//!
//! - [`overtake`] - One overtake attempt: vision check, companion telemetry, lane change, merge back.
//! - [`gap`] - Merge-gap detection from side-sensor samples.
//! - [`stop_policy`] - Grace counter for obstacles that are not vehicles.
//! - [`vehicle`] - Main car loop with blind-spot assist.
//! - [`companion`] - Companion car loop and telemetry replies.

pub mod companion;
pub mod gap;
pub mod overtake;
pub mod stop_policy;
pub mod vehicle;

pub use companion::Companion;
pub use gap::{GapDetector, GapEvent, GapState};
pub use overtake::{Io, Orchestrator, Outcome, Phase};
pub use stop_policy::StopPolicy;
pub use vehicle::{BlindSpotLeds, MainCar};
