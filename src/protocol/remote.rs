// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Remote-control tokens from the Bluetooth link.
//!
//! The receive interrupt only posts the latest byte into a [`CommandMailbox`]; decoding and
//! actuation happen in the control loop.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::error::{Error, Result};
use crate::motors::{MotorState, SpeedLevel};

/// Order every car boots into.
pub const INITIAL_ORDER: u8 = b'S';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteCommand {
    Direction(MotorState),
    Speed(SpeedLevel),
}

impl RemoteCommand {
    pub fn decode(token: u8) -> Result<Self> {
        if SpeedLevel::is_token(token) {
            return SpeedLevel::from_token(token).map(RemoteCommand::Speed);
        }
        MotorState::from_token(token)
            .map(RemoteCommand::Direction)
            .map_err(|_| Error::InvalidCommand)
    }
}

/// Latest remote order, shared between the receive interrupt and the control loop.
///
/// Only the most recent byte is kept. The control loop reads it every pass, so a superseded order
/// is never acted on.
pub struct CommandMailbox {
    order: AtomicU8,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            order: AtomicU8::new(INITIAL_ORDER),
        }
    }

    /// Called from the receive interrupt.
    #[inline]
    pub fn post(&self, token: u8) {
        self.order.store(token, Ordering::Release);
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.order.load(Ordering::Acquire)
    }

    /// Replace the order from the control loop, e.g. to stop in front of an obstacle.
    #[inline]
    pub fn force(&self, token: u8) {
        log_info!("mailbox: order forced to {}", token as char);
        self.post(token);
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.peek() == MotorState::Stop.token()
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_token_families() {
        assert_eq!(
            RemoteCommand::decode(b'G'),
            Ok(RemoteCommand::Direction(MotorState::ForwardLeft))
        );
        assert_eq!(
            RemoteCommand::decode(b'q'),
            Ok(RemoteCommand::Speed(SpeedLevel::MAX))
        );
        assert_eq!(
            RemoteCommand::decode(b'3'),
            Ok(RemoteCommand::Speed(SpeedLevel::new(3).unwrap()))
        );
        assert_eq!(RemoteCommand::decode(b'?'), Err(Error::InvalidCommand));
        assert_eq!(RemoteCommand::decode(0), Err(Error::InvalidCommand));
    }

    #[test]
    fn mailbox_keeps_latest_order() {
        let mb = CommandMailbox::new();
        assert!(mb.stop_requested());

        mb.post(b'F');
        mb.post(b'7');
        assert_eq!(mb.peek(), b'7');
        assert!(!mb.stop_requested());

        mb.force(b'S');
        assert!(mb.stop_requested());
    }
}
