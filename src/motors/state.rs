// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor direction and speed vocabulary shared by the actuator, the remote link and the
//! orchestrator.

use crate::error::{Error, Result};

/// Direction the car is currently being driven in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    #[default]
    Stop,
    Forward,
    Backward,
    /// Pivot right: only the left pair drives.
    Right,
    /// Pivot left: only the right pair drives.
    Left,
    ForwardLeft,
    ForwardRight,
    BackLeft,
    BackRight,
}

impl MotorState {
    /// Decode a remote direction token.
    pub fn from_token(token: u8) -> Result<Self> {
        match token {
            b'F' => Ok(MotorState::Forward),
            b'B' => Ok(MotorState::Backward),
            b'S' => Ok(MotorState::Stop),
            b'R' => Ok(MotorState::Right),
            b'L' => Ok(MotorState::Left),
            b'G' => Ok(MotorState::ForwardLeft),
            b'I' => Ok(MotorState::ForwardRight),
            b'J' => Ok(MotorState::BackRight),
            b'H' => Ok(MotorState::BackLeft),
            _ => Err(Error::InvalidCommand),
        }
    }

    pub fn token(self) -> u8 {
        match self {
            MotorState::Forward => b'F',
            MotorState::Backward => b'B',
            MotorState::Stop => b'S',
            MotorState::Right => b'R',
            MotorState::Left => b'L',
            MotorState::ForwardLeft => b'G',
            MotorState::ForwardRight => b'I',
            MotorState::BackRight => b'J',
            MotorState::BackLeft => b'H',
        }
    }

    /// Inner-wheel bias for diagonal motion, or `None` for straight and pivot motion.
    pub fn bias(self) -> Option<TurnBias> {
        match self {
            MotorState::ForwardLeft => Some(TurnBias::FORWARD.on(Side::Left)),
            MotorState::ForwardRight => Some(TurnBias::FORWARD.on(Side::Right)),
            MotorState::BackLeft => Some(TurnBias::BACKWARD.on(Side::Left)),
            MotorState::BackRight => Some(TurnBias::BACKWARD.on(Side::Right)),
            _ => None,
        }
    }
}

/// Left/right half of the chassis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Scale applied to the inner wheel pair during a diagonal turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnBias {
    /// Multiplier numerator over 10.
    pub tenths: u16,
    /// Wheel pair that is slowed down.
    pub inner: Side,
}

impl TurnBias {
    const FORWARD: Self = Self {
        tenths: 4,
        inner: Side::Left,
    };
    const BACKWARD: Self = Self {
        tenths: 3,
        inner: Side::Left,
    };

    fn on(self, inner: Side) -> Self {
        Self { inner, ..self }
    }

    /// Inner-wheel duty, truncated toward zero.
    #[inline]
    pub fn apply(self, duty: u16) -> u16 {
        ((duty as u32 * self.tenths as u32) / 10) as u16
    }
}

/// Discrete speed setting, 0 (stalled) to 10 (full duty).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    pub const MIN: Self = Self(0);
    pub const HALF: Self = Self(5);
    pub const MAX: Self = Self(10);
    /// Power-up speed.
    pub const DEFAULT: Self = Self(4);

    /// Duty step per level against a 10000 PWM period.
    pub const DUTY_PER_LEVEL: u16 = 1_000;

    pub fn new(level: u8) -> Result<Self> {
        if level <= Self::MAX.0 {
            Ok(Self(level))
        } else {
            Err(Error::OutOfRange)
        }
    }

    /// Clamp to the valid range instead of failing.
    pub fn saturating(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    /// Decode `'0'`..=`'9'` and `'q'` (full speed).
    pub fn from_token(token: u8) -> Result<Self> {
        match token {
            b'0'..=b'9' => Ok(Self(token - b'0')),
            b'q' => Ok(Self::MAX),
            _ => Err(Error::InvalidCommand),
        }
    }

    /// True for `'0'`..=`'9'` and `'q'`.
    pub fn is_token(token: u8) -> bool {
        matches!(token, b'0'..=b'9' | b'q')
    }

    #[inline]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Offset by `steps`, saturating at the maximum level.
    pub fn plus(self, steps: u8) -> Self {
        Self::saturating(self.0.saturating_add(steps))
    }

    #[inline]
    pub fn duty(self) -> u16 {
        self.0 as u16 * Self::DUTY_PER_LEVEL
    }
}

impl Default for SpeedLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}
