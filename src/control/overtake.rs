// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Overtake orchestrator.
//!
//! Runs once per forward-obstacle detection:
//!
//! ```text
//! Idle -> HandshakeVision -> HandshakeTelemetry -> Decide -> Maneuvering(side)
//!      -> WatchGap(side) -> Restoring(side) -> Idle
//! ```
//!
//! Any handshake failure returns to `Idle` with the car still going straight at its previous speed.
//! The lane changes are open-loop timed scripts; only the merge back is gated on the side sensor.
//! A stop order on the remote link interrupts the timed phases between slices.

use embedded_hal::delay::DelayNs;

use crate::config::OvertakeConfig;
use crate::drivers::l298n::MotorBridge;
use crate::error::{Error, Result};
use crate::motors::{MotorActuator, MotorState, Side, SpeedLevel};
use crate::protocol::{ByteLink, CommandMailbox, LinkHandshake, TelemetryRecord, VisionVerdict};
use crate::sensors::{Channel, RangeFinder};

use super::gap::{GapDetector, GapEvent};
use super::stop_policy::StopPolicy;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    HandshakeVision,
    HandshakeTelemetry,
    Decide,
    Maneuvering(Side),
    WatchGap(Side),
    Restoring(Side),
}

impl Phase {
    /// The car has left its lane (or is about to).
    pub fn is_maneuvering(self) -> bool {
        matches!(
            self,
            Phase::Maneuvering(_) | Phase::WatchGap(_) | Phase::Restoring(_)
        )
    }
}

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The camera saw something that isn't a car.
    NotVehicle { stopped: bool },
    /// Slowed down behind the companion. `lane_blocked` is set when both sides were occupied,
    /// otherwise the companion itself reported an obstacle.
    Following { lane_blocked: bool },
    /// Passed the companion on `side` and merged back.
    Overtaken(Side),
    /// A stop order arrived during the maneuver; the car is stopped.
    Preempted,
}

/// Everything a run drives, borrowed from the owner of the control loop.
pub struct Io<'a, B: MotorBridge, R, L, D> {
    pub motors: &'a mut MotorActuator<B>,
    pub sensors: &'a mut R,
    pub link: &'a mut LinkHandshake<L>,
    pub delay: &'a mut D,
    pub mailbox: &'a CommandMailbox,
}

/// Why a run stopped early.
enum Interrupt {
    Stop,
    Fault(Error),
}

impl From<Error> for Interrupt {
    fn from(e: Error) -> Self {
        Interrupt::Fault(e)
    }
}

type Step<T> = core::result::Result<T, Interrupt>;

fn steer(side: Side) -> MotorState {
    match side {
        Side::Left => MotorState::Left,
        Side::Right => MotorState::Right,
    }
}

pub struct Orchestrator {
    cfg: OvertakeConfig,
    stop: StopPolicy,
    phase: Phase,
}

impl Orchestrator {
    pub fn new(cfg: OvertakeConfig) -> Self {
        Self {
            stop: StopPolicy::new(cfg.stop_grace),
            cfg,
            phase: Phase::Idle,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stop_policy(&self) -> &StopPolicy {
        &self.stop
    }

    /// Run the whole sequence once. Always ends in `Idle`.
    ///
    /// Errors are the handshake's protocol errors and timeouts (car untouched), or a failure while
    /// out of lane (car stopped, stop order posted).
    pub fn run<B, R, L, D>(&mut self, io: &mut Io<'_, B, R, L, D>) -> Result<Outcome>
    where
        B: MotorBridge,
        R: RangeFinder,
        L: ByteLink,
        D: DelayNs,
    {
        let cruise = io.motors.speed();
        let res = self.sequence(io, cruise);
        let out = match res {
            Ok(outcome) => {
                log_info!("overtake: {:?}", outcome);
                Ok(outcome)
            }
            Err(Interrupt::Stop) => {
                log_warn!("overtake: stop order in {:?}", self.phase);
                io.motors.preset_speed(cruise);
                io.motors.stop().map(|_| Outcome::Preempted)
            }
            Err(Interrupt::Fault(e)) => {
                if self.phase.is_maneuvering() {
                    log_error!("overtake: {:?} failed in {:?}, stopping", e, self.phase);
                    io.mailbox.force(MotorState::Stop.token());
                    io.motors.preset_speed(cruise);
                    io.motors.stop()?;
                } else {
                    log_warn!("overtake: aborted in {:?}: {:?}", self.phase, e);
                }
                Err(e)
            }
        };
        self.enter(Phase::Idle);
        out
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            log_debug!("overtake: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn sequence<B, R, L, D>(
        &mut self,
        io: &mut Io<'_, B, R, L, D>,
        cruise: SpeedLevel,
    ) -> Step<Outcome>
    where
        B: MotorBridge,
        R: RangeFinder,
        L: ByteLink,
        D: DelayNs,
    {
        self.enter(Phase::HandshakeVision);
        if io.link.request_vision(io.delay)? == VisionVerdict::Obstacle {
            let stopped = self.stop.obstacle_seen();
            if stopped {
                io.mailbox.force(MotorState::Stop.token());
                io.motors.stop()?;
            }
            return Ok(Outcome::NotVehicle { stopped });
        }
        self.stop.vehicle_seen();

        self.enter(Phase::HandshakeTelemetry);
        let companion = io.link.request_telemetry(io.delay)?;

        self.enter(Phase::Decide);
        let follow =
            SpeedLevel::saturating(companion.speed()).plus(self.cfg.follow_speed_increment);
        if companion.object_detected() {
            io.motors.set_speed(follow)?;
            return Ok(Outcome::Following {
                lane_blocked: false,
            });
        }

        let side = if self.side_clear(io, Side::Right)? {
            Side::Right
        } else if self.side_clear(io, Side::Left)? {
            Side::Left
        } else {
            io.motors.set_speed(follow)?;
            return Ok(Outcome::Following { lane_blocked: true });
        };

        self.maneuver(io, side, &companion)?;
        self.watch_gap(io, side)?;
        self.restore(io, side, cruise)?;

        Ok(Outcome::Overtaken(side))
    }

    /// A side is clear if its reading is above the clearance. No echo counts as blocked.
    fn side_clear<B, R, L, D>(&mut self, io: &mut Io<'_, B, R, L, D>, side: Side) -> Step<bool>
    where
        B: MotorBridge,
        R: RangeFinder,
        D: DelayNs,
    {
        match io.sensors.measure(side.into(), io.delay) {
            Ok(s) => Ok(s.above(self.cfg.side_clear_cm)),
            Err(Error::Timeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn maneuver<B, R, L, D>(
        &mut self,
        io: &mut Io<'_, B, R, L, D>,
        side: Side,
        companion: &TelemetryRecord,
    ) -> Step<()>
    where
        B: MotorBridge,
        D: DelayNs,
    {
        self.enter(Phase::Maneuvering(side));
        io.motors.preset_speed(self.cfg.maneuver_speed);

        self.drive(io, steer(side), self.cfg.steer_in_ms)?;
        self.drive(io, MotorState::Forward, self.cfg.straight_ms)?;
        self.drive(io, steer(side.opposite()), self.cfg.steer_back_ms)?;

        let pass = SpeedLevel::saturating(companion.speed()).plus(self.cfg.pass_speed_increment);
        io.motors.set_speed(pass)?;
        io.motors.set_direction(MotorState::Forward)?;
        Ok(())
    }

    /// Sample the side facing the passed car until the gap behind it is confirmed.
    fn watch_gap<B, R, L, D>(&mut self, io: &mut Io<'_, B, R, L, D>, side: Side) -> Step<()>
    where
        B: MotorBridge,
        R: RangeFinder,
        D: DelayNs,
    {
        self.enter(Phase::WatchGap(side));
        let channel = Channel::from(side.opposite());
        let mut gap = GapDetector::new(self.cfg.gap_requires_alongside);

        while gap.samples() < self.cfg.gap_watch_limit {
            if io.mailbox.stop_requested() {
                return Err(Interrupt::Stop);
            }
            let clear = match io.sensors.measure(channel, io.delay) {
                Ok(s) => s.above(self.cfg.gap_cm),
                Err(Error::Timeout) => false,
                Err(e) => return Err(e.into()),
            };
            match gap.feed(clear) {
                GapEvent::Sample => {}
                GapEvent::Hold => self.wait(io, self.cfg.gap_confirm_hold_ms)?,
                GapEvent::Confirmed => {
                    log_debug!("overtake: gap confirmed after {} samples", gap.samples());
                    return Ok(());
                }
            }
        }
        Err(Error::Timeout.into())
    }

    fn restore<B, R, L, D>(
        &mut self,
        io: &mut Io<'_, B, R, L, D>,
        side: Side,
        cruise: SpeedLevel,
    ) -> Step<()>
    where
        B: MotorBridge,
        D: DelayNs,
    {
        self.enter(Phase::Restoring(side));
        io.motors.preset_speed(self.cfg.maneuver_speed);

        self.drive(io, steer(side.opposite()), self.cfg.restore_steer_in_ms)?;
        self.drive(io, MotorState::Forward, self.cfg.restore_straight_ms)?;
        self.drive(io, steer(side), self.cfg.restore_steer_back_ms)?;

        io.motors.preset_speed(cruise);
        io.motors.set_direction(MotorState::Forward)?;
        Ok(())
    }

    fn drive<B, R, L, D>(
        &self,
        io: &mut Io<'_, B, R, L, D>,
        dir: MotorState,
        ms: u32,
    ) -> Step<()>
    where
        B: MotorBridge,
        D: DelayNs,
    {
        io.motors.set_direction(dir)?;
        self.wait(io, ms)
    }

    /// Busy-wait `ms` in slices, giving up at the first slice boundary that sees a stop order.
    fn wait<B, R, L, D>(&self, io: &mut Io<'_, B, R, L, D>, ms: u32) -> Step<()>
    where
        B: MotorBridge,
        D: DelayNs,
    {
        let slice = self.cfg.preempt_slice_ms.max(1);
        let mut remaining = ms;
        loop {
            if io.mailbox.stop_requested() {
                return Err(Interrupt::Stop);
            }
            if remaining == 0 {
                return Ok(());
            }
            let step = remaining.min(slice);
            io.delay.delay_ms(step);
            remaining -= step;
        }
    }
}
