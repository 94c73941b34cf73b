// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Distance Sensing
//!
//! Four HC-SR04 rangers, one per side of the car, behind the [`RangeFinder`] seam. Every call is a
//! fresh ping; nothing is cached.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::config::SensorConfig;
use crate::drivers::Hcsr04;
use crate::error::Result;
use crate::motors::Side;

/// Sensor position on the chassis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Forward,
    Left,
    Right,
    Backward,
}

impl From<Side> for Channel {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Channel::Left,
            Side::Right => Channel::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistanceSample {
    pub channel: Channel,
    pub cm: f32,
    /// Echo outlasted the maximum flight time; `cm` is the maximum measurable range.
    pub saturated: bool,
}

impl DistanceSample {
    pub fn new(channel: Channel, cm: f32) -> Self {
        Self {
            channel,
            cm,
            saturated: false,
        }
    }

    /// Strictly closer than `cm`. A saturated sample is never below anything in range.
    #[inline]
    pub fn below(&self, cm: f32) -> bool {
        !self.saturated && self.cm < cm
    }

    /// Strictly farther than `cm`.
    #[inline]
    pub fn above(&self, cm: f32) -> bool {
        self.saturated || self.cm > cm
    }
}

/// Anything that can produce a distance sample for a channel.
pub trait RangeFinder {
    fn measure<D: DelayNs>(&mut self, channel: Channel, delay: &mut D) -> Result<DistanceSample>;
}

/// The car's four rangers.
pub struct SensorArray<FT, FE, LT, LE, RT, RE, BT, BE> {
    forward: Hcsr04<FT, FE>,
    left: Hcsr04<LT, LE>,
    right: Hcsr04<RT, RE>,
    backward: Hcsr04<BT, BE>,
    cfg: SensorConfig,
}

impl<FT, FE, LT, LE, RT, RE, BT, BE> SensorArray<FT, FE, LT, LE, RT, RE, BT, BE>
where
    FT: OutputPin,
    FE: InputPin,
    LT: OutputPin,
    LE: InputPin,
    RT: OutputPin,
    RE: InputPin,
    BT: OutputPin,
    BE: InputPin,
{
    pub fn new(
        forward: Hcsr04<FT, FE>,
        left: Hcsr04<LT, LE>,
        right: Hcsr04<RT, RE>,
        backward: Hcsr04<BT, BE>,
        cfg: SensorConfig,
    ) -> Self {
        Self {
            forward,
            left,
            right,
            backward,
            cfg,
        }
    }
}

impl<FT, FE, LT, LE, RT, RE, BT, BE> RangeFinder for SensorArray<FT, FE, LT, LE, RT, RE, BT, BE>
where
    FT: OutputPin,
    FE: InputPin,
    LT: OutputPin,
    LE: InputPin,
    RT: OutputPin,
    RE: InputPin,
    BT: OutputPin,
    BE: InputPin,
{
    fn measure<D: DelayNs>(&mut self, channel: Channel, delay: &mut D) -> Result<DistanceSample> {
        let echo = match channel {
            Channel::Forward => self.forward.ping(delay, &self.cfg),
            Channel::Left => self.left.ping(delay, &self.cfg),
            Channel::Right => self.right.ping(delay, &self.cfg),
            Channel::Backward => self.backward.ping(delay, &self.cfg),
        };

        match echo {
            Ok(echo) => {
                if echo.saturated {
                    log_debug!("sensors: {:?} saturated", channel);
                }
                Ok(DistanceSample {
                    channel,
                    cm: echo.cm,
                    saturated: echo.saturated,
                })
            }
            Err(e) => {
                log_warn!("sensors: {:?} ping failed: {:?}", channel, e);
                Err(e)
            }
        }
    }
}
