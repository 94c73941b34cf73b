// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Companion car loop.
//!
//! The companion is driven by remote like the main car, stops by itself in front of close
//! obstacles, and answers telemetry requests from its co-processor with one packed status byte.

use embedded_hal::delay::DelayNs;

use crate::config::CompanionConfig;
use crate::drivers::l298n::MotorBridge;
use crate::error::{Error, Result};
use crate::motors::{MotorActuator, MotorState};
use crate::protocol::messages::REQ_TELEMETRY;
use crate::protocol::telemetry::RED;
use crate::protocol::{ByteLink, CommandMailbox, RemoteCommand, TelemetryRecord};
use crate::sensors::{Channel, RangeFinder};

pub struct Companion<'m, B: MotorBridge, R, L, D> {
    motors: MotorActuator<B>,
    sensors: R,
    link: L,
    delay: D,
    mailbox: &'m CommandMailbox,
    cfg: CompanionConfig,
    last_order: Option<u8>,
}

impl<'m, B, R, L, D> Companion<'m, B, R, L, D>
where
    B: MotorBridge,
    R: RangeFinder,
    L: ByteLink,
    D: DelayNs,
{
    pub fn new(
        motors: MotorActuator<B>,
        sensors: R,
        link: L,
        delay: D,
        mailbox: &'m CommandMailbox,
        cfg: CompanionConfig,
    ) -> Self {
        Self {
            motors,
            sensors,
            link,
            delay,
            mailbox,
            cfg,
            last_order: None,
        }
    }

    pub fn motors(&self) -> &MotorActuator<B> {
        &self.motors
    }

    /// Speed as reported to the main car: 0 when ordered to stop, one digit otherwise.
    pub fn reported_speed(&self) -> u8 {
        if self.mailbox.stop_requested() {
            0
        } else {
            self.motors.speed().level().min(9)
        }
    }

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
            Ok(RemoteCommand::Direction(dir)) => {
                self.motors.set_direction(dir)?;
            }
            Err(e) => {
                if fresh {
                    log_warn!("companion: ignoring order {}: {:?}", order, e);
                }
            }
        }

        if order == MotorState::Forward.token() {
            match self.sensors.measure(Channel::Forward, &mut self.delay) {
                Ok(s) if s.below(self.cfg.stop_cm) => self.halt()?,
                Ok(_) | Err(Error::Timeout) => {}
                Err(e) => return Err(e),
            }
        }

        match self.link.try_receive()? {
            Some(REQ_TELEMETRY) => self.report(),
            Some(other) => {
                log_debug!("companion: unknown request {}", other);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Answer one telemetry request.
    fn report(&mut self) -> Result<()> {
        let speed = self.reported_speed();
        let object_detected = match self.sensors.measure(Channel::Forward, &mut self.delay) {
            Ok(s) if s.below(self.cfg.stop_cm) => {
                self.halt()?;
                true
            }
            Ok(s) => s.below(self.cfg.detect_cm),
            // Can't vouch for the road ahead.
            Err(Error::Timeout) => true,
            Err(e) => return Err(e),
        };

        let record = TelemetryRecord::new(RED, object_detected, speed)?;
        log_debug!("companion: reporting {}", record.encode());
        self.link.send(record.encode())
    }

    fn halt(&mut self) -> Result<()> {
        self.mailbox.force(MotorState::Stop.token());
        self.motors.stop()?;
        Ok(())
    }
}
