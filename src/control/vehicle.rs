// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main car control loop.
//!
//! Each [`MainCar::step`] applies the latest remote order and, while the car is heading forward,
//! periodically looks ahead and hands over to the [`Orchestrator`] when something is close.
//!
//! Remote turns go through blind-spot assist: if the side sensor sees something close, the car keeps
//! going straight and that side's LED lights up instead.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::config::{Config, OvertakeConfig};
use crate::drivers::l298n::MotorBridge;
use crate::error::{Error, Result};
use crate::hw::Led;
use crate::motors::{MotorActuator, MotorState, Side};
use crate::protocol::{ByteLink, CommandMailbox, LinkHandshake, RemoteCommand};
use crate::sensors::{Channel, RangeFinder};

use super::overtake::{Io, Orchestrator, Outcome};

/// Left/right blind-spot indicators.
pub struct BlindSpotLeds<RP: OutputPin, LP: OutputPin> {
    right: Led<RP>,
    left: Led<LP>,
}

impl<RP: OutputPin, LP: OutputPin> BlindSpotLeds<RP, LP> {
    pub fn new(right: Led<RP>, left: Led<LP>) -> Self {
        Self { right, left }
    }

    pub fn set(&mut self, side: Side, on: bool) -> Result<()> {
        match side {
            Side::Right => self.right.set(on),
            Side::Left => self.left.set(on),
        }
    }

    pub fn is_on(&self, side: Side) -> bool {
        match side {
            Side::Right => self.right.is_on(),
            Side::Left => self.left.is_on(),
        }
    }
}

pub struct MainCar<'m, B, R, L, D, RP, LP>
where
    B: MotorBridge,
    RP: OutputPin,
    LP: OutputPin,
{
    motors: MotorActuator<B>,
    sensors: R,
    link: LinkHandshake<L>,
    delay: D,
    mailbox: &'m CommandMailbox,
    leds: BlindSpotLeds<RP, LP>,
    orchestrator: Orchestrator,
    cfg: OvertakeConfig,

    /// Passes since the last forward check.
    passes: u32,
    last_order: Option<u8>,
    /// Assist is holding the car straight instead of turning, per side.
    held_right: bool,
    held_left: bool,
}

impl<'m, B, R, L, D, RP, LP> MainCar<'m, B, R, L, D, RP, LP>
where
    B: MotorBridge,
    R: RangeFinder,
    L: ByteLink,
    D: DelayNs,
    RP: OutputPin,
    LP: OutputPin,
{
    pub fn new(
        motors: MotorActuator<B>,
        sensors: R,
        link: LinkHandshake<L>,
        delay: D,
        mailbox: &'m CommandMailbox,
        leds: BlindSpotLeds<RP, LP>,
        cfg: &Config,
    ) -> Self {
        Self {
            motors,
            sensors,
            link,
            delay,
            mailbox,
            leds,
            orchestrator: Orchestrator::new(cfg.overtake),
            cfg: cfg.overtake,
            // Look ahead on the very first forward pass.
            passes: cfg.overtake.forward_check_interval,
            last_order: None,
            held_right: false,
            held_left: false,
        }
    }

    pub fn motors(&self) -> &MotorActuator<B> {
        &self.motors
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn blind_spot(&self, side: Side) -> bool {
        self.leds.is_on(side)
    }

    /// One pass of the control loop.
    pub fn step(&mut self) -> Result<()> {
        let order = self.mailbox.peek();
        let fresh = self.last_order != Some(order);
        self.last_order = Some(order);

        match RemoteCommand::decode(order) {
            Ok(RemoteCommand::Speed(level)) => {
                if fresh {
                    self.motors.set_speed(level)?;
                }
            }
            Ok(RemoteCommand::Direction(MotorState::Right)) => self.assist(Side::Right)?,
            Ok(RemoteCommand::Direction(MotorState::Left)) => self.assist(Side::Left)?,
            Ok(RemoteCommand::Direction(MotorState::Forward)) => {
                self.motors.set_direction(MotorState::Forward)?;
            }
            Ok(RemoteCommand::Direction(dir)) => {
                self.leds.set(Side::Right, false)?;
                self.leds.set(Side::Left, false)?;
                self.held_right = false;
                self.held_left = false;
                self.motors.set_direction(dir)?;
            }
            Err(e) => {
                if fresh {
                    log_warn!("car: ignoring order {}: {:?}", order, e);
                }
            }
        }

        let heading_forward =
            order == MotorState::Forward.token() || self.held_right || self.held_left;
        let res = if heading_forward && self.passes >= self.cfg.forward_check_interval {
            self.passes = 0;
            self.look_ahead()
        } else {
            Ok(())
        };
        self.passes = self.passes.saturating_add(1);
        res
    }

    /// Turn toward `side` unless something is in that blind spot.
    fn assist(&mut self, side: Side) -> Result<()> {
        let blocked = match self.sensors.measure(side.into(), &mut self.delay) {
            Ok(s) => s.below(self.cfg.blind_spot_cm),
            Err(Error::Timeout) => true,
            Err(e) => return Err(e),
        };

        self.leds.set(side, blocked)?;
        match side {
            Side::Right => self.held_right = blocked,
            Side::Left => self.held_left = blocked,
        }

        let dir = if blocked {
            MotorState::Forward
        } else if side == Side::Right {
            MotorState::Right
        } else {
            MotorState::Left
        };
        self.motors.set_direction(dir)?;
        Ok(())
    }

    fn look_ahead(&mut self) -> Result<()> {
        let ahead = match self.sensors.measure(Channel::Forward, &mut self.delay) {
            Ok(s) => s,
            // Nothing came back; try again next interval.
            Err(Error::Timeout) => return Ok(()),
            Err(e) => return Err(e),
        };
        if !ahead.below(self.cfg.near_cm) {
            return Ok(());
        }

        log_info!("car: obstacle at {} cm", ahead.cm);
        let res = self.orchestrator.run(&mut Io {
            motors: &mut self.motors,
            sensors: &mut self.sensors,
            link: &mut self.link,
            delay: &mut self.delay,
            mailbox: self.mailbox,
        });
        self.delay.delay_us(self.cfg.settle_us);

        match res? {
            Outcome::Overtaken(Side::Right) => self.leds.set(Side::Right, false),
            Outcome::Overtaken(Side::Left) => {
                // Right was blocked, that's why we went left.
                self.leds.set(Side::Right, true)?;
                self.leds.set(Side::Left, false)
            }
            Outcome::Following { lane_blocked: true } => {
                self.leds.set(Side::Right, true)?;
                self.leds.set(Side::Left, true)
            }
            _ => Ok(()),
        }
    }
}
