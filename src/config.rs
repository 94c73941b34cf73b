// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tunable constants, grouped by subsystem.
//!
//! Defaults reproduce the calibration of the demo cars. Timings were measured as SysTick busy-wait
//! ticks on a 2 MHz SysTick (AHB/8), i.e. one tick = 0.5 µs, and are stored here in µs/ms.

use crate::motors::SpeedLevel;

/// Full firmware configuration.
#[derive(Copy, Clone, Debug, Default)]
pub struct Config {
    pub drive: DriveConfig,
    pub sensor: SensorConfig,
    pub link: LinkConfig,
    pub overtake: OvertakeConfig,
    pub companion: CompanionConfig,
}

impl Config {
    pub fn with_drive(mut self, drive: DriveConfig) -> Self {
        self.drive = drive;
        self
    }

    pub fn with_sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    pub fn with_overtake(mut self, overtake: OvertakeConfig) -> Self {
        self.overtake = overtake;
        self
    }

    pub fn with_companion(mut self, companion: CompanionConfig) -> Self {
        self.companion = companion;
        self
    }
}

/// Motor actuator settings.
#[derive(Copy, Clone, Debug)]
pub struct DriveConfig {
    /// Speed level in effect at power-up.
    pub initial_speed: SpeedLevel,
    /// PWM auto-reload value; duty values are expressed against it.
    pub pwm_period: u16,
    /// TIM2 prescaler.
    pub pwm_prescaler: u16,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            initial_speed: SpeedLevel::DEFAULT,
            pwm_period: 10_000,
            pwm_prescaler: 64,
        }
    }
}

/// HC-SR04 timing and conversion.
#[derive(Copy, Clone, Debug)]
pub struct SensorConfig {
    /// Trigger held low before the pulse.
    pub trigger_settle_us: u32,
    /// Trigger pulse width.
    pub trigger_pulse_us: u32,
    /// Time for the sensor to emit its 8-cycle 40 kHz burst.
    pub burst_wait_us: u32,
    /// Busy-wait after each echo poll.
    pub echo_poll_us: u32,
    /// Measured wall-clock duration of one counting iteration (busy-wait plus loop overhead).
    pub iteration_us: f32,
    /// Polls to wait for the echo to rise before giving up.
    pub max_rise_polls: u32,
    /// Polls to count while the echo is high before reporting a saturated sample.
    pub max_echo_polls: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            trigger_settle_us: 3,
            trigger_pulse_us: 10,
            burst_wait_us: 250,
            echo_poll_us: 2,
            iteration_us: 6.125,
            max_rise_polls: 20_000,
            // ~400 cm, the HC-SR04's rated range.
            max_echo_polls: 3_800,
        }
    }
}

impl SensorConfig {
    pub fn with_max_echo_polls(mut self, polls: u32) -> Self {
        self.max_echo_polls = polls;
        self
    }

    pub fn with_max_rise_polls(mut self, polls: u32) -> Self {
        self.max_rise_polls = polls;
        self
    }
}

/// Companion link (USART1) receive bounds.
#[derive(Copy, Clone, Debug)]
pub struct LinkConfig {
    /// Busy-wait between empty receive polls.
    pub receive_poll_us: u32,
    /// Empty polls tolerated per receive before `Timeout`.
    pub receive_timeout_polls: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            receive_poll_us: 100,
            // 10 s: the vision co-processor captures a long-exposure frame per request.
            receive_timeout_polls: 100_000,
        }
    }
}

impl LinkConfig {
    pub fn with_receive_timeout_polls(mut self, polls: u32) -> Self {
        self.receive_timeout_polls = polls;
        self
    }
}

/// Overtake maneuver thresholds and script timings.
#[derive(Copy, Clone, Debug)]
pub struct OvertakeConfig {
    /// Forward obstacle closer than this engages the orchestrator.
    pub near_cm: f32,
    /// A side reading above this allows a lane change to that side.
    pub side_clear_cm: f32,
    /// A side reading at or below this means the companion is alongside.
    pub gap_cm: f32,
    /// A side reading below this blocks a remote-commanded turn.
    pub blind_spot_cm: f32,

    /// Speed level used while steering out and back in.
    pub maneuver_speed: SpeedLevel,
    /// Added to the companion's speed when holding lane behind it.
    pub follow_speed_increment: u8,
    /// Added to the companion's speed while passing it.
    pub pass_speed_increment: u8,

    pub steer_in_ms: u32,
    pub straight_ms: u32,
    pub steer_back_ms: u32,
    pub restore_steer_in_ms: u32,
    pub restore_straight_ms: u32,
    pub restore_steer_back_ms: u32,
    /// Hold after the first above-threshold side reading before re-sampling.
    pub gap_confirm_hold_ms: u32,

    /// Require the companion to be seen alongside before looking for the gap.
    pub gap_requires_alongside: bool,
    /// Side samples taken while watching for the gap before giving up.
    pub gap_watch_limit: u32,
    /// Non-vehicle obstacle confirmations tolerated before stopping.
    pub stop_grace: u8,
    /// Granularity of timed phases; a stop order is honoured between slices.
    pub preempt_slice_ms: u32,
    /// Control-loop passes between forward obstacle checks.
    pub forward_check_interval: u32,
    /// Pause after each orchestrator run.
    pub settle_us: u32,
}

impl Default for OvertakeConfig {
    fn default() -> Self {
        Self {
            near_cm: 70.0,
            side_clear_cm: 20.0,
            gap_cm: 50.0,
            blind_spot_cm: 20.0,

            maneuver_speed: SpeedLevel::HALF,
            follow_speed_increment: 2,
            pass_speed_increment: 4,

            steer_in_ms: 500,
            straight_ms: 900,
            steer_back_ms: 700,
            restore_steer_in_ms: 500,
            restore_straight_ms: 1_000,
            restore_steer_back_ms: 400,
            gap_confirm_hold_ms: 2_000,

            gap_requires_alongside: true,
            gap_watch_limit: 50_000,
            stop_grace: 2,
            preempt_slice_ms: 10,
            forward_check_interval: 250_000,
            settle_us: 500,
        }
    }
}

impl OvertakeConfig {
    pub fn with_gap_watch_limit(mut self, samples: u32) -> Self {
        self.gap_watch_limit = samples;
        self
    }

    pub fn with_stop_grace(mut self, grace: u8) -> Self {
        self.stop_grace = grace;
        self
    }

    pub fn with_forward_check_interval(mut self, passes: u32) -> Self {
        self.forward_check_interval = passes;
        self
    }

    pub fn with_gap_requires_alongside(mut self, required: bool) -> Self {
        self.gap_requires_alongside = required;
        self
    }

    /// Total script time of the lane change out, in ms.
    pub fn maneuver_ms(&self) -> u32 {
        self.steer_in_ms + self.straight_ms + self.steer_back_ms
    }

    /// Total script time of the lane change back, in ms.
    pub fn restore_ms(&self) -> u32 {
        self.restore_steer_in_ms + self.restore_straight_ms + self.restore_steer_back_ms
    }
}

/// Companion car thresholds.
#[derive(Copy, Clone, Debug)]
pub struct CompanionConfig {
    /// Forward reading below this stops the companion.
    pub stop_cm: f32,
    /// Forward reading below this is reported as an obstacle ahead of the companion.
    pub detect_cm: f32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            stop_cm: 20.0,
            detect_cm: 200.0,
        }
    }
}
